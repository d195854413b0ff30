use crate::auth::jwt::JwtConfig;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a number, got '{raw}'")),
        Err(_) => default,
    }
}

/// Server configuration loaded from environment variables.
///
/// Everything except the secrets has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind, `0.0.0.0` unless overridden.
    pub host: String,
    /// TCP port, 3000 unless overridden.
    pub port: u16,
    /// Origins allowed by CORS, comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Per-request deadline enforced in the middleware stack, in seconds.
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks to finish, in seconds.
    pub shutdown_timeout_secs: u64,
    /// Token signing parameters.
    pub jwt: JwtConfig,
    /// Base URL of the IA engine serving logistics and marketing predictions.
    pub ia_engine_url: String,
    /// Payment gateway configuration (checkout sessions, plan price ids).
    pub billing: BillingConfig,
    /// Static bearer token the fulfillment provider presents when pushing
    /// order status updates.
    pub fulfillment_token: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `IA_ENGINE_URL`         | `http://localhost:8000`    |
    /// | `FULFILLMENT_API_TOKEN` | **required**               |
    ///
    /// JWT and billing variables are documented on [`JwtConfig::from_env`]
    /// and [`BillingConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics if a required secret is missing or a numeric variable fails
    /// to parse. Misconfiguration should fail at startup, not at first use.
    pub fn from_env() -> Self {
        let fulfillment_token =
            std::env::var("FULFILLMENT_API_TOKEN").expect("FULFILLMENT_API_TOKEN is required");
        assert!(
            !fulfillment_token.is_empty(),
            "FULFILLMENT_API_TOKEN must not be blank"
        );

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: parsed_env("PORT", 3000),
            cors_origins: split_origins(&env_or("CORS_ORIGINS", "http://localhost:5173")),
            request_timeout_secs: parsed_env("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: parsed_env("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            ia_engine_url: env_or("IA_ENGINE_URL", "http://localhost:8000"),
            billing: BillingConfig::from_env(),
            fulfillment_token,
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

/// Payment gateway configuration.
///
/// Plan names are part of the public API; the price ids they map to are
/// deployment-specific and stay out of client hands.
#[derive(Debug, Clone)]
pub struct BillingConfig {
    /// Base URL of the payment gateway API.
    pub gateway_url: String,
    /// Gateway API secret key, sent as a bearer token.
    pub secret_key: String,
    /// Browser redirect after a completed checkout.
    pub success_url: String,
    /// Browser redirect after an abandoned checkout.
    pub cancel_url: String,
    /// Price id for the `premium-listener` plan.
    pub price_premium_listener: String,
    /// Price id for the `artist-pro` plan.
    pub price_artist_pro: String,
    /// Price id for the `artist-ai-plus` plan.
    pub price_artist_ai_plus: String,
}

impl BillingConfig {
    /// Load billing configuration from environment variables.
    ///
    /// | Env Var                          | Default                                   |
    /// |----------------------------------|-------------------------------------------|
    /// | `BILLING_GATEWAY_URL`            | `https://api.payments.example`            |
    /// | `BILLING_SECRET_KEY`             | **required**                              |
    /// | `BILLING_SUCCESS_URL`            | `http://localhost:5173/subscribe/success` |
    /// | `BILLING_CANCEL_URL`             | `http://localhost:5173/subscribe/cancel`  |
    /// | `BILLING_PRICE_PREMIUM_LISTENER` | `price_premium_listener_monthly`          |
    /// | `BILLING_PRICE_ARTIST_PRO`       | `price_artist_pro_monthly`                |
    /// | `BILLING_PRICE_ARTIST_AI_PLUS`   | `price_artist_ai_plus_monthly`            |
    ///
    /// # Panics
    ///
    /// Panics if `BILLING_SECRET_KEY` is not set or is empty.
    pub fn from_env() -> Self {
        let secret_key =
            std::env::var("BILLING_SECRET_KEY").expect("BILLING_SECRET_KEY is required");
        assert!(!secret_key.is_empty(), "BILLING_SECRET_KEY must not be blank");

        Self {
            gateway_url: env_or("BILLING_GATEWAY_URL", "https://api.payments.example"),
            secret_key,
            success_url: env_or(
                "BILLING_SUCCESS_URL",
                "http://localhost:5173/subscribe/success",
            ),
            cancel_url: env_or(
                "BILLING_CANCEL_URL",
                "http://localhost:5173/subscribe/cancel",
            ),
            price_premium_listener: env_or(
                "BILLING_PRICE_PREMIUM_LISTENER",
                "price_premium_listener_monthly",
            ),
            price_artist_pro: env_or("BILLING_PRICE_ARTIST_PRO", "price_artist_pro_monthly"),
            price_artist_ai_plus: env_or(
                "BILLING_PRICE_ARTIST_AI_PLUS",
                "price_artist_ai_plus_monthly",
            ),
        }
    }

    /// Resolve a public plan name to its configured gateway price id.
    ///
    /// Returns `None` for plan names this deployment does not sell.
    pub fn price_for_plan(&self, plan: &str) -> Option<&str> {
        match plan {
            "premium-listener" => Some(&self.price_premium_listener),
            "artist-pro" => Some(&self.price_artist_pro),
            "artist-ai-plus" => Some(&self.price_artist_ai_plus),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_billing() -> BillingConfig {
        BillingConfig {
            gateway_url: "https://gateway.test".to_string(),
            secret_key: "sk_test".to_string(),
            success_url: "https://app.test/success".to_string(),
            cancel_url: "https://app.test/cancel".to_string(),
            price_premium_listener: "price_pl".to_string(),
            price_artist_pro: "price_ap".to_string(),
            price_artist_ai_plus: "price_ai".to_string(),
        }
    }

    #[test]
    fn known_plans_resolve_to_their_price_ids() {
        let billing = test_billing();
        assert_eq!(billing.price_for_plan("premium-listener"), Some("price_pl"));
        assert_eq!(billing.price_for_plan("artist-pro"), Some("price_ap"));
        assert_eq!(billing.price_for_plan("artist-ai-plus"), Some("price_ai"));
    }

    #[test]
    fn unknown_plan_resolves_to_none() {
        let billing = test_billing();
        assert_eq!(billing.price_for_plan("free-forever"), None);
        assert_eq!(billing.price_for_plan(""), None);
    }

    #[test]
    fn origin_list_is_trimmed_and_non_empty() {
        let origins = split_origins(" https://a.example , https://b.example ,, ");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
    }
}
