use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("serapis")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Serapis Contributors")
        .about("Extract term-bearing sentences and presentation features from web pages")
        .arg(clap::arg!(<URL> "Page URL"))
        .arg(clap::arg!(<TERM> "Search term"))
        .arg(
            clap::arg!(-b --backend <BACKEND> "Extraction backend (direct, article-api)")
                .value_name("BACKEND")
                .default_value("direct")
                .value_parser(["direct", "article-api"]),
        )
        .arg(
            clap::arg!(-c --config <FILE> "Configuration file (default: user config dir)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--html <FILE> "Read the page from a local file or '-' for stdin instead of fetching URL"))
        .arg(clap::arg!(--retries <NUM> "Number of fetch attempts"))
        .arg(clap::arg!(--"retry-delay" <SECS> "Seconds to wait between fetch attempts"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(--"save-html" "Include the page HTML in the record"))
        .arg(clap::arg!(--token <TOKEN> "Article API token"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--pretty "Pretty-print the JSON record"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
        .arg(
            clap::arg!(--completions <SHELL> "Generate shell completion script")
                .value_name("SHELL")
                .value_parser(["bash", "zsh", "fish", "powershell"]),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "serapis", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "serapis", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "serapis", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "serapis", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
