use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::BRIEFCASE, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn company(name: &str) -> String {
    name.style(theme().accent.clone()).to_string()
}

/// Overall score coloured by band: 70+ good, 40+ fair, below that weak
pub fn score(value: f64) -> String {
    let text = format!("{:.1}", value);
    let style = if value >= 70.0 {
        theme().success.clone()
    } else if value >= 40.0 {
        theme().warn.clone()
    } else {
        theme().error.clone()
    };
    text.style(style).to_string()
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

pub fn banner(title: &str, subtitle: &str) {
    println!();
    println!("  {} {}", Icons::ROCKET, title);
    println!("  {}", subtitle.style(theme().dim.clone()));
    println!();
}
