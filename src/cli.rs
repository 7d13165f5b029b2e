use clap::Parser;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[arg(help = "The syntax tree JSON file or URL")]
    pub input: String,

    #[arg(long, help = "Generate only the named definition")]
    pub name: Option<String>,

    #[arg(long, help = "Pretty-print the generated JSON")]
    pub pretty: bool,
}
