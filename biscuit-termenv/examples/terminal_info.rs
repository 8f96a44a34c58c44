//! Example: Display the detected terminal environment
//!
//! Run with: cargo run -p biscuit-termenv --example terminal_info
//!
//! Set `RUST_LOG=biscuit_termenv=debug` to see which signal decided the
//! color space.

use biscuit_termenv::{ColorSpace, TerminalEnvironment, strip};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let term = TerminalEnvironment::new();

    println!("=== Terminal Environment ===\n");
    println!("Runtime:  {}", term.runtime);
    println!("Platform: {}", term.platform);
    println!("TTY:      {}", if term.is_tty { "yes" } else { "no" });
    match term.ci {
        Some(vendor) => println!("CI:       {vendor}"),
        None => println!("CI:       no"),
    }

    println!("\n=== Capabilities ===\n");
    println!("Color Space: {}", term.color_space);
    println!("16 colors:   {}", if term.is_16_color_supported() { "yes" } else { "no" });
    println!("256 colors:  {}", if term.is_256_color_supported() { "yes" } else { "no" });
    println!("True color:  {}", if term.is_true_color_supported() { "yes" } else { "no" });
    println!("Unicode:     {}", if term.unicode { "yes" } else { "no" });

    println!("\n=== Dimensions ===\n");
    println!("Width:  {} columns", term.size.width);
    println!("Height: {} rows", term.size.height);

    println!("\n=== Sample ===\n");
    let sample = match term.color_space {
        ColorSpace::TrueColor => "\x1b[38;2;255;140;0mtrue color orange\x1b[0m",
        ColorSpace::Ansi256 => "\x1b[38;5;208m256 color orange\x1b[0m",
        ColorSpace::Ansi16 => "\x1b[33m16 color yellow\x1b[0m",
        ColorSpace::Mono => "\x1b[1mmonochrome\x1b[0m",
    };
    if term.is_colors_supported() {
        println!("{sample}");
    } else {
        println!("{}", strip(sample));
    }
}
