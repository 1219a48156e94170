use std::env;
use tracing::warn;

const DEFAULT_GENERATION_HOUR_UTC: u32 = 2;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub slot_generation_hour_utc: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            slot_generation_hour_utc: env::var("SLOT_GENERATION_HOUR_UTC")
                .ok()
                .and_then(|value| value.parse::<u32>().ok())
                .filter(|hour| *hour < 24)
                .unwrap_or_else(|| {
                    warn!(
                        "SLOT_GENERATION_HOUR_UTC not set or invalid, defaulting to {:02}:00 UTC",
                        DEFAULT_GENERATION_HOUR_UTC
                    );
                    DEFAULT_GENERATION_HOUR_UTC
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}
