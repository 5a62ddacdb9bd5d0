use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("readmode")
        .version(env!("CARGO_PKG_VERSION"))
        .author("readmode contributors")
        .about("Read web pages without the clutter")
        .arg(clap::arg!([INPUT] "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (markdown, html, text, toc, print)")
                .default_value("markdown")
                .value_parser(["markdown", "md", "html", "text", "txt", "toc", "print", "pdf"]),
        )
        .arg(
            clap::arg!(--export <DIR> "Also save the Markdown as <title>.md in this directory")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--"base-url" <URL> "URL that relative links and images resolve against"))
        .arg(
            clap::arg!(--pattern <SELECTOR> "Extra content selector, tried before the built-in ones")
                .action(clap::ArgAction::Append),
        )
        .arg(
            clap::arg!(--settings <FILE> "Settings file")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--theme <THEME> "Color theme").value_parser(["light", "dark", "auto"]))
        .arg(clap::arg!(--"font-size" <PX> "Font size in pixels"))
        .arg(clap::arg!(--width <PX> "Content width in pixels"))
        .arg(clap::arg!(--"font-family" <FAMILY> "Font family name, system-ui, or a custom font name"))
        .arg(clap::arg!(--"line-height" <NUM> "Line height multiplier"))
        .arg(clap::arg!(--"font-weight" <WEIGHT> "Font weight").value_parser(["normal", "500", "bold"]))
        .arg(clap::arg!(--"save-settings" "Persist the effective settings"))
        .arg(clap::arg!(--dark "Resolve the auto theme as dark"))
        .arg(clap::arg!(--message <JSON> "Send one JSON message and print the reply"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
        .arg(
            clap::arg!(--completions <SHELL> "Generate shell completion script")
                .value_parser(["bash", "zsh", "fish", "powershell", "elvish"]),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "readmode", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "readmode", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "readmode", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "readmode", &completions_dir).unwrap();

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
