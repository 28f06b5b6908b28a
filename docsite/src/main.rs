use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use siteconf::Config;
use siteconf::error::Result;
use siteconf::options::Environment;
use siteconf::value::Value;

mod site;

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Resolves the documentation site's configuration.
        cmd docsite {
            /// Site root. Defaults to the current directory.
            optional root: PathBuf
            /// Configuration file to load instead of the site's own.
            optional -c, --config config: PathBuf
            /// Environment to load for: `development` or `build`.
            optional -e, --environment environment: String
            /// Page path to print the layout of.
            repeated -p, --page page: String
            /// Print the resolved configuration as JSON.
            optional --json
        }
    }
}

fn print(config: &Config, pages: &[String]) {
    println!("environment: {}", config.environment);
    for (option, value) in config.settings.to_dict() {
        println!("  {option} = {value}");
    }

    if !config.layouts.is_empty() {
        println!("layouts:");
        for rule in config.layouts.iter() {
            println!("  {} => {}", rule.pattern, rule.layout);
        }
    }

    if !config.proxies.is_empty() {
        println!("proxies:");
        for proxy in config.proxies.iter() {
            println!("  {} => {}", proxy.path, proxy.template);
        }
    }

    if !config.extensions.is_empty() {
        println!("extensions:");
        for activation in &config.extensions {
            println!("  {} {}", activation.extension, Value::from(activation.options.clone()));
        }
    }

    if let Some(deploy) = &config.deploy {
        println!("deploy: {} to {}/{}", deploy.method, deploy.remote, deploy.branch);
    }

    for page in pages {
        println!("{page}: {}", config.layout_for(page));
    }
}

fn run(flags: flags::Docsite) -> Result<()> {
    let environment = match flags.environment.as_deref() {
        Some(name) => Environment::parse(name)?,
        None => Environment::default(),
    };

    let root = flags.root.unwrap_or_else(|| PathBuf::from("."));
    tracing::debug!(root = %root.display(), %environment, "resolving site configuration");
    let config = site::load(&root, flags.config.as_deref(), environment)?;
    if flags.json {
        let json = serde_json::to_string_pretty(&config)?;
        println!("{json}");
    } else {
        print(&config, &flags.page);
    }

    Ok(())
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("DOCSITE_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let flags = flags::Docsite::from_env_or_exit();
    if let Err(e) = run(flags) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
