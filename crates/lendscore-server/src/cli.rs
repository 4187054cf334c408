use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "lendscore-server")]
#[command(about = "Lendscore credit risk scoring service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "lendscore.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Preprocessor artifact path
    #[arg(long)]
    pub preprocessor: Option<String>,

    /// Classifier artifact path
    #[arg(long)]
    pub classifier: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
