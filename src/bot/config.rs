use std::env;

/* Config holds everything the bot reads from the environment.
 * The token and application id are required; the bot refuses to start
 * without them. The guild id and HTTP port are optional.
 */

const DEFAULT_PORT: u16 = 3000;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for environment variable {0}")]
    InvalidVar(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub token: String,
    pub application_id: u64,
    pub guild_id: Option<u64>,
    pub port: u16,
}

impl Config {
    /* Reads the configuration from the process environment.
     * GUILD_ID switches command registration from global to guild-scoped.
     */
    pub fn from_env() -> Result<Config, ConfigError> {
        let token = env::var("DISCORD_TOKEN").map_err(|_| ConfigError::MissingVar("DISCORD_TOKEN"))?;
        if token.trim().is_empty() {
            return Err(ConfigError::MissingVar("DISCORD_TOKEN"));
        }

        let application_id = env::var("APPLICATION_ID")
            .map_err(|_| ConfigError::MissingVar("APPLICATION_ID"))?
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidVar("APPLICATION_ID"))?;
        if application_id == 0 {
            return Err(ConfigError::InvalidVar("APPLICATION_ID"));
        }

        let guild_id = match env::var("GUILD_ID") {
            Ok(raw) => {
                let id = raw.parse::<u64>().map_err(|_| ConfigError::InvalidVar("GUILD_ID"))?;
                if id == 0 {
                    return Err(ConfigError::InvalidVar("GUILD_ID"));
                }
                Some(id)
            }
            Err(_) => None,
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidVar("PORT"))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Config {
            token,
            application_id,
            guild_id,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-wide, so all cases run in one test.
    #[test]
    fn test_from_env() {
        env::remove_var("DISCORD_TOKEN");
        env::remove_var("APPLICATION_ID");
        env::remove_var("GUILD_ID");
        env::remove_var("PORT");

        assert_eq!(
            Config::from_env(),
            Err(ConfigError::MissingVar("DISCORD_TOKEN"))
        );

        env::set_var("DISCORD_TOKEN", "test-token");
        assert_eq!(
            Config::from_env(),
            Err(ConfigError::MissingVar("APPLICATION_ID"))
        );

        env::set_var("APPLICATION_ID", "not-a-number");
        assert_eq!(
            Config::from_env(),
            Err(ConfigError::InvalidVar("APPLICATION_ID"))
        );

        env::set_var("APPLICATION_ID", "123456789");
        let config = Config::from_env().unwrap();
        assert_eq!(config.token, "test-token");
        assert_eq!(config.application_id, 123456789);
        assert_eq!(config.guild_id, None);
        assert_eq!(config.port, DEFAULT_PORT);

        env::set_var("GUILD_ID", "987654321");
        env::set_var("PORT", "8080");
        let config = Config::from_env().unwrap();
        assert_eq!(config.guild_id, Some(987654321));
        assert_eq!(config.port, 8080);

        env::remove_var("DISCORD_TOKEN");
        env::remove_var("APPLICATION_ID");
        env::remove_var("GUILD_ID");
        env::remove_var("PORT");
    }
}
