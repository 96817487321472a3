use nulltrace_svgxml::{render_to_string, SvgXmlConfig, SvgXmlContext, SvgXmlError, SvgXmlProps};
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let verbose = take_flag(&mut args, "--verbose");
    let with_stylesheet = take_flag(&mut args, "--stylesheet");
    let config_path = match take_option(&mut args, "--config") {
        Ok(path) => path,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        }
    };

    // --verbose forces DEBUG, otherwise RUST_LOG applies
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if args.is_empty() {
        eprintln!("Usage: svgxml-render [--verbose] [--stylesheet] [--config config.yaml] <file.svg>...");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  svgxml-render icon.svg");
        eprintln!("  svgxml-render --config svgxml.yaml icons/*.svg");
        process::exit(1);
    }

    let context = match load_context(config_path.as_deref()) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("✗ configuration has errors:");
            print_error(&e);
            process::exit(1);
        }
    };

    if with_stylesheet {
        println!("<style>\n{}</style>", context.sheet.to_css());
    }

    let mut exit_code = 0;
    for file_path in &args {
        match render_file(file_path, &context) {
            Ok(markup) => println!("{}", markup),
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path);
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn take_option(args: &mut Vec<String>, name: &str) -> Result<Option<String>, String> {
    let Some(pos) = args.iter().position(|a| a == name) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        return Err(format!("{} expects a value", name));
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

fn load_context(path: Option<&str>) -> Result<SvgXmlContext, SvgXmlError> {
    let config = match path {
        Some(path) => SvgXmlConfig::from_yaml(&fs::read_to_string(path)?)?,
        None => SvgXmlConfig::default(),
    };
    Ok(SvgXmlContext::new(config))
}

fn render_file(path: &str, context: &SvgXmlContext) -> Result<String, SvgXmlError> {
    let xml = fs::read_to_string(path)?;
    render_to_string(&SvgXmlProps::new(xml), context)
}

fn print_error(error: &SvgXmlError) {
    match error {
        SvgXmlError::MalformedMarkup { reason } => {
            eprintln!("  Malformed markup:");
            eprintln!("    {}", reason);
        }
        SvgXmlError::UnsupportedSelfClosing => {
            eprintln!("  Self-closing <svg/> root");
            eprintln!("    Set 'allowSelfClosing: true' in the configuration to accept it");
        }
        other => eprintln!("  {}", other),
    }
}
