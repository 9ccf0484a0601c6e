/// Command definition used to generate shell completions. Long flags match `Args` in `main.rs`.
pub fn command() -> clap::Command {
    clap::Command::new("clipmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Capture web pages as clean markdown")
        .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .conflicts_with("output_dir"),
        )
        .arg(
            clap::arg!(-d --output_dir <DIR> "Write into DIR using a dated file name")
                .long("output-dir")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format")
                .default_value("markdown")
                .value_parser(["markdown", "json", "html", "text"]),
        )
        .arg(clap::arg!(-s --selector <CSS> ... "Custom content selector"))
        .arg(clap::arg!(-x --exclude <CSS> ... "Extra selector removed from the content"))
        .arg(clap::arg!(--url <URL> "Document URL for file or stdin input"))
        .arg(clap::arg!(--keep_ads "Keep ad-like blocks").long("keep-ads"))
        .arg(clap::arg!(--keep_nav "Keep navigation, headers and footers").long("keep-nav"))
        .arg(clap::arg!(--no_clean "Skip the cleaning pass entirely").long("no-clean"))
        .arg(clap::arg!(--no_wait "Do not wait for images before extracting").long("no-wait"))
        .arg(clap::arg!(--no_frontmatter "Omit the frontmatter block").long("no-frontmatter"))
        .arg(clap::arg!(--minimal_frontmatter "Reduced frontmatter").long("minimal-frontmatter"))
        .arg(
            clap::arg!(--heading_style <STYLE> "Heading style")
                .long("heading-style")
                .default_value("atx")
                .value_parser(["atx", "setext"]),
        )
        .arg(
            clap::arg!(--bullet <MARKER> "Bullet list marker")
                .default_value("-")
                .value_parser(["-", "*", "+"]),
        )
        .arg(
            clap::arg!(--code_style <STYLE> "Code block style")
                .long("code-style")
                .default_value("fenced")
                .value_parser(["fenced", "indented"]),
        )
        .arg(
            clap::arg!(--link_style <STYLE> "Link style")
                .long("link-style")
                .default_value("inlined")
                .value_parser(["inlined", "referenced"]),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").long("user-agent"))
        .arg(clap::arg!(--diagnostics "Print quality score and paywall check"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"))
}
