use clap::Parser;

/// Command-line configuration. All four flags are required; there is no
/// fallback to environment variables for credentials.
#[derive(Parser, Debug, Clone)]
#[command(name = "wp-seo-optimizer")]
#[command(about = "Adds missing SEO metadata to published WordPress posts")]
#[command(version)]
pub struct Config {
    /// WordPress site URL (e.g. https://example.com)
    #[arg(long)]
    pub url: String,

    /// WordPress username
    #[arg(long)]
    pub username: String,

    /// WordPress application password
    #[arg(long)]
    pub password: String,

    /// Google Gemini API key
    #[arg(long)]
    pub gemini_api_key: String,
}
