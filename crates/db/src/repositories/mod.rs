//! All SQL lives here, one zero-sized repo struct per table. Methods are
//! associated functions taking `&PgPool`, so call sites never hold repo
//! instances.

pub mod payment_event_repo;
pub mod play_event_repo;
pub mod playlist_repo;
pub mod pod_order_repo;
pub mod role_repo;
pub mod session_repo;
pub mod track_repo;
pub mod user_repo;

pub use payment_event_repo::PaymentEventRepo;
pub use play_event_repo::PlayEventRepo;
pub use playlist_repo::PlaylistRepo;
pub use pod_order_repo::PodOrderRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use track_repo::TrackRepo;
pub use user_repo::UserRepo;
