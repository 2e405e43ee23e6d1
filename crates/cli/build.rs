use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("unclutter")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Unclutter Contributors")
        .about("Strip boilerplate from fetched articles")
        .arg(clap::arg!(<INPUT> "Local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (html, text, json)")
                .value_name("FORMAT")
                .default_value("html")
                .value_parser(["html", "text", "json"]),
        )
        .arg(clap::arg!(--annotate "Record per-candidate scores instead of pruning"))
        .arg(clap::arg!(--no_signatures "Skip content signatures and always score"))
        .arg(
            clap::arg!(--signature <SELECTOR> "Extra content signature, tried before the built-in ones")
                .value_name("SELECTOR")
                .action(clap::ArgAction::Append),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
        .arg(
            clap::arg!(--completions <SHELL> "Generate shell completion script")
                .value_name("SHELL")
                .value_parser(["bash", "zsh", "fish", "powershell"]),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "unclutter", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "unclutter", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "unclutter", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "unclutter", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
