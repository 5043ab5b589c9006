use std::io::Write;
use std::panic;
use std::sync::Mutex;

// Import everything from the lib version of ourselves
use axoasset::LocalAsset;
use clap::Parser;
use cli::{Cli, Commands, ConfigSchemaArgs, InitArgs, OutputFormat, ReleaseArgs};
use console::Term;
use miette::{Diagnostic, IntoDiagnostic};
use shipwright::*;
use shipwright_schema::ReleaseReport;
use thiserror::Error;
use tracing::error;

mod cli;

type ReportErrorFunc = dyn Fn(&miette::Report) + Send + Sync + 'static;

static REPORT_ERROR: Mutex<Option<Box<ReportErrorFunc>>> = Mutex::new(None);

fn set_report_errors_as_json() {
    *REPORT_ERROR.lock().unwrap() = Some(Box::new(move |error| {
        // Manually invoke JSONReportHandler to format the error as a report
        // to out_.
        let mut report = String::new();
        miette::JSONReportHandler::new()
            .render_report(&mut report, error.as_ref())
            .unwrap();
        writeln!(&mut Term::stdout(), r#"{{"error": {report}}}"#).unwrap();
    }));
}

fn report_error(error: &miette::Report) {
    {
        let guard = REPORT_ERROR.lock().unwrap();
        if let Some(do_report) = &*guard {
            do_report(error);
            return;
        }
    }
    error!("{:?}", error);
}

fn main() {
    let cli = Cli::parse();
    // Init the logger
    tracing_subscriber::fmt::fmt()
        .with_max_level(cli.verbose)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_ansi(console::colors_enabled_stderr())
        .init();

    // Control how errors are formatted by setting the miette hook. This will
    // only be used for errors presented to humans, when formatting an error as
    // JSON, it will be handled by a custom `report_error` override, bypassing
    // the hook.
    miette::set_hook(Box::new(move |_| {
        let graphical_theme = if console::colors_enabled_stderr() {
            miette::GraphicalTheme::unicode()
        } else {
            miette::GraphicalTheme::unicode_nocolor()
        };
        Box::new(
            miette::MietteHandlerOpts::new()
                .graphical_theme(graphical_theme)
                .build(),
        )
    }))
    .expect("failed to initialize error handler");

    // Now that miette is set up, use it to format panics.
    panic::set_hook(Box::new(move |panic_info| {
        let payload = panic_info.payload();
        let message = if let Some(msg) = payload.downcast_ref::<&str>() {
            msg
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            &msg[..]
        } else {
            "something went wrong"
        };

        #[derive(Debug, Error, Diagnostic)]
        #[error("{message}")]
        pub struct PanicError {
            pub message: String,
            #[help]
            pub help: Option<String>,
        }

        report_error(
            &miette::Report::from(PanicError {
                message: message.to_owned(),
                help: panic_info
                    .location()
                    .map(|loc| format!("at {}:{}:{}", loc.file(), loc.line(), loc.column())),
            })
            .wrap_err("shipwright panicked"),
        );
    }));

    // If we're outputting JSON, replace the error report method such that it
    // writes errors out to the normal output stream as JSON.
    if cli.output_format == OutputFormat::Json {
        set_report_errors_as_json();
    }

    let main_result = real_main(&cli);

    let _ = main_result.map_err(|e| {
        report_error(&e);
        std::process::exit(-1);
    });
}

fn real_main(cli: &Cli) -> Result<(), miette::Report> {
    match &cli.command {
        Some(Commands::Release(args)) => cmd_release(cli, args),
        Some(Commands::Init(args)) => cmd_init(cli, args),
        Some(Commands::ConfigSchema(args)) => cmd_config_schema(cli, args),
        None => cmd_release(cli, &ReleaseArgs::default()),
    }
}

fn print_human(out: &mut Term, report: &ReleaseReport) -> Result<(), std::io::Error> {
    let what = if report.snapshot {
        "snapshot"
    } else {
        "release"
    };
    writeln!(out, "{what} {} completed", report.version)?;
    for artifact in &report.artifacts {
        writeln!(out, "  {artifact}")?;
    }
    Ok(())
}

fn print_json(out: &mut Term, report: &ReleaseReport) -> Result<(), std::io::Error> {
    let string = serde_json::to_string_pretty(report).unwrap();
    writeln!(out, "{string}")?;
    Ok(())
}

fn cmd_release(cli: &Cli, args: &ReleaseArgs) -> Result<(), miette::Report> {
    let args = shipwright::ReleaseArgs {
        root: LocalAsset::current_dir()?,
        config: args.config.clone(),
        release_notes: args.release_notes.clone(),
        skip_validate: args.skip_validate,
        skip_publish: args.skip_publish,
        snapshot: args.snapshot,
        parallelism: args.parallelism,
    };
    let report = do_release(&args)?;
    let mut out = Term::stdout();
    match cli.output_format {
        OutputFormat::Human => print_human(&mut out, &report).into_diagnostic()?,
        OutputFormat::Json => print_json(&mut out, &report).into_diagnostic()?,
    }
    Ok(())
}

fn cmd_init(cli: &Cli, args: &InitArgs) -> Result<(), miette::Report> {
    let root = LocalAsset::current_dir()?;
    let path = do_init(&root, Some(args.config.as_path()))?;
    let mut out = Term::stdout();
    match cli.output_format {
        OutputFormat::Human => writeln!(out, "wrote {path}").into_diagnostic()?,
        OutputFormat::Json => {
            let json = serde_json::json!({ "config": path });
            writeln!(out, "{json}").into_diagnostic()?
        }
    }
    Ok(())
}

fn cmd_config_schema(_cli: &Cli, _args: &ConfigSchemaArgs) -> Result<(), miette::Report> {
    let schema = do_config_schema()?;
    writeln!(Term::stdout(), "{schema}").into_diagnostic()?;
    Ok(())
}
