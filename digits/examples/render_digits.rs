//! Print the first records of an IDX dataset as ASCII art

use clap::Parser;
use digits::{open, Bitmap};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Render IDX digit records as text", long_about = None)]
struct Cli {
    /// Image file (idx3-ubyte)
    images: PathBuf,

    /// Label file (idx1-ubyte)
    labels: PathBuf,

    /// Number of records to print
    #[arg(short = 'n', long, default_value_t = 3)]
    count: usize,

    /// Print raw intensities instead of the thresholded picture
    #[arg(long)]
    numeric: bool,

    /// Intensity below which a pixel renders as white
    #[arg(long)]
    threshold: Option<u8>,
}

fn print_bitmap(index: usize, bitmap: &Bitmap, cli: &Cli) {
    println!("Record {index} (label {})", bitmap.label());
    if cli.numeric {
        println!("{bitmap}");
    } else {
        match cli.threshold {
            Some(threshold) => println!("{}", bitmap.render(threshold)),
            None => println!("{}", bitmap.render_default()),
        }
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut reader = open(&cli.images, &cli.labels)?;
    println!(
        "{} records of {} ({} shown)",
        reader.count(),
        reader.shape(),
        cli.count.min(reader.count())
    );
    println!();

    for (index, record) in reader.records().take(cli.count).enumerate() {
        print_bitmap(index, &record?, &cli);
    }

    Ok(())
}
