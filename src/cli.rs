use clap::Parser;

use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
  // Performance tuning options
  #[arg(short, long, value_name = "FLOAT", help = "Tick rate, i.e. number of ticks per second", default_value_t = 1.0)]
  pub tick_rate: f64,

  #[arg(
    short('r'),
    long,
    value_name = "FLOAT",
    help = "Frame rate, i.e. number of frames per second",
    default_value_t = 4.0
  )]
  pub frame_rate: f64,

  // Server connection options
  #[arg(short('u'), long = "url", value_name = "URL", help = "Base URL of the SQL assistant service")]
  pub url: Option<String>,

  #[arg(
    short('c'),
    long = "config-profile",
    value_name = "PROFILE",
    help = "Use specific server profile from config.toml (0-based index)"
  )]
  pub config_profile: Option<usize>,

  #[arg(short('l'), long = "page-size", value_name = "ROWS", help = "Initial rows per page in the table browser")]
  pub page_size: Option<u64>,
}

impl Cli {
  /// Build the service base URL with CLI > ENV > CONFIG > default priority.
  pub fn build_server_url(&self, config_servers: &[toml::Value]) -> Result<String, String> {
    if let Some(url) = &self.url {
      return Ok(normalize_url(url));
    }

    if let Ok(url) = std::env::var("QUERY_PILOT_URL") {
      if !url.is_empty() {
        return Ok(normalize_url(&url));
      }
    }

    if let Some(profile_index) = self.config_profile {
      let profile = config_servers
        .get(profile_index)
        .ok_or_else(|| format!("Server profile {} not found in config.toml", profile_index))?;
      let url =
        profile.get("url").and_then(|v| v.as_str()).ok_or_else(|| format!("Server profile {} has no url", profile_index))?;
      return Ok(normalize_url(url));
    }

    if let Some(url) = config_servers.first().and_then(|profile| profile.get("url")).and_then(|v| v.as_str()) {
      return Ok(normalize_url(url));
    }

    Ok("http://localhost:5000".to_string())
  }
}

fn normalize_url(url: &str) -> String {
  url.trim().trim_end_matches('/').to_string()
}
