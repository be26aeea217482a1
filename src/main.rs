//! drop-grader CLI
//!
//! Entry point for the `drop-grader` command-line tool.

use clap::{Parser, Subcommand, ValueEnum};
use drop_grader::{
    Assignment, Evaluation, MemoryReportStore, Orchestrator, ReplayRunner, SubmissionRef, SubmissionStatus,
};
use log::{debug, info, LevelFilter};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "drop-grader")]
#[command(about = "Evaluate builds of programming assignment submissions", version)]
struct Cli {
    /// Logging level
    #[arg(long, short = 'L', value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a finished build from its console log and project folder
    Evaluate {
        /// Path to the assignment file
        #[arg(long, short = 'a')]
        assignment: PathBuf,

        /// Console output of the build
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Project folder the build ran in
        #[arg(long, short = 'p')]
        project: PathBuf,

        /// Submission identifier
        #[arg(long, default_value = "local")]
        submission: String,

        /// The build was aborted by its time limit
        #[arg(long)]
        timed_out: bool,

        /// Treat logs longer than this many lines as overflowing
        #[arg(long)]
        max_output_lines: Option<usize>,

        /// Show only what the submitter may see
        #[arg(long)]
        student_view: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Verify an assignment file
    Verify {
        /// Path to the assignment file
        #[arg(long, short = 'a')]
        assignment: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level.into()) {
        eprintln!("Error initialising logging: {}", e);
        process::exit(1);
    }

    match cli.command {
        Commands::Evaluate {
            assignment,
            output,
            project,
            submission,
            timed_out,
            max_output_lines,
            student_view,
            json,
        } => {
            let runner = ReplayRunner::new(output)
                .expired_by_timeout(timed_out)
                .max_output_lines(max_output_lines);
            run_evaluate(&assignment, runner, project, &submission, student_view, json);
        }
        Commands::Verify { assignment } => {
            run_verify(&assignment);
        }
    }
}

fn init_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    debug!("Logging level {} enabled", level);
    Ok(())
}

fn run_evaluate(
    assignment_path: &Path,
    runner: ReplayRunner,
    project: PathBuf,
    submission: &str,
    student_view: bool,
    json: bool,
) {
    let assignment = match Assignment::from_file(assignment_path) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let store = MemoryReportStore::new();
    if let Err(e) = store.register_assignment(&assignment) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let orchestrator = Orchestrator::new(Arc::new(runner), Arc::new(store));
    let evaluation = match orchestrator.evaluate(&project, &assignment, &SubmissionRef::new(submission)) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Evaluation error: {}", e);
            process::exit(1);
        }
    };
    info!("Evaluated {} in {}", submission, project.display());

    let evaluation = if student_view {
        evaluation.visible_to_student()
    } else {
        evaluation
    };

    if json {
        match serde_json::to_string_pretty(&evaluation) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print_human(&evaluation);
    }

    if evaluation.status != SubmissionStatus::Validated {
        process::exit(2);
    }
}

fn print_human(evaluation: &Evaluation) {
    println!("Status: {} ({})", evaluation.status, evaluation.status.code());
    for indicator in &evaluation.indicators {
        match (indicator.progress, indicator.goal) {
            (Some(progress), Some(goal)) => println!(
                "  {:<20} {} ({}/{})",
                indicator.key.description(),
                indicator.value,
                progress,
                goal
            ),
            _ => println!("  {:<20} {}", indicator.key.description(), indicator.value),
        }
    }
    if let Some(time) = evaluation.elapsed_time_junit {
        println!("  Instructor tests took {:.3} sec", time);
    }
    if let Some(coverage) = evaluation.student_coverage {
        println!("  Student tests coverage: {}%", coverage);
    }
    if !evaluation.compilation_errors.is_empty() {
        println!();
        println!("Compilation errors:");
        for line in &evaluation.compilation_errors {
            println!("  {}", line);
        }
    }
    if !evaluation.checkstyle_errors.is_empty() {
        println!();
        println!("Style errors:");
        for line in &evaluation.checkstyle_errors {
            println!("  {}", line);
        }
    }
}

fn run_verify(path: &Path) {
    match Assignment::from_file(path) {
        Ok(assignment) => {
            println!("Assignment valid: {}", path.display());
            println!();
            println!("  Id: {}", assignment.id);
            println!("  Build engine: {}", assignment.build_engine);
            println!("  Language: {:?}", assignment.language);
            if let Some(ref package) = assignment.package_name {
                println!("  Package: {}", package);
            }
            if assignment.accepts_student_tests {
                match assignment.min_student_tests {
                    Some(min) => println!("  Student tests: accepted (minimum {})", min),
                    None => println!("  Student tests: accepted"),
                }
            }
            if let Some(ref suffix) = assignment.mandatory_tests_suffix {
                println!("  Mandatory suffix: {}", suffix);
            }
            println!("  Hidden tests: {:?}", assignment.hidden_visibility());
            println!("  Test methods: {}", assignment.test_methods.len());
            if let Err(e) = assignment.engine() {
                eprintln!("Warning: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}
