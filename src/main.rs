//! ace - run one Generate -> Reflect -> Curate cycle
//!
//! Run with: cargo run
//! Options: --json, --playbook <path>, --problem <text>

use ace_loop::{AceAgent, AceConfig, ContextPlaybook, CycleRecord, Problem};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

struct CliArgs {
    json: bool,
    playbook: Option<PathBuf>,
    problem: Option<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs {
        json: false,
        playbook: None,
        problem: None,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => cli.json = true,
            "--playbook" => {
                let path = iter.next().context("Usage: --playbook <path>")?;
                cli.playbook = Some(PathBuf::from(path));
            }
            "--problem" => {
                let text = iter.next().context("Usage: --problem <text>")?;
                cli.problem = Some(text.clone());
            }
            other => bail!("unknown argument: {}", other),
        }
    }
    Ok(cli)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;
    let config = AceConfig::from_env();

    let playbook = match cli.playbook.as_ref().or(config.playbook_path.as_ref()) {
        Some(path) => ContextPlaybook::load(path)?,
        None => ContextPlaybook::default(),
    };
    let problem = Problem::new(cli.problem.unwrap_or_else(|| config.problem.clone()));
    tracing::info!(
        seeded_patterns = playbook.successful_patterns.len(),
        max_attempts = config.max_attempts,
        "starting"
    );

    let mut agent = AceAgent::sample_with_playbook(playbook).with_config(config.orchestrator());
    agent.process_task(&problem).context("ACE cycle aborted")?;

    let record = agent
        .last_cycle()
        .context("cycle finished without a record")?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        print_record(record);
    }
    Ok(())
}

fn print_record(record: &CycleRecord) {
    println!("\n{}", "=".repeat(60));
    println!("ACE CYCLE {}", record.cycle_id);
    println!("{}", "=".repeat(60));
    println!("\nProblem: {}", record.problem);

    println!("\n### Generated Solutions");
    let mut by_position: Vec<_> = record.ranking.iter().collect();
    by_position.sort_by_key(|c| c.position);
    for candidate in &by_position {
        let solution = &candidate.solution;
        println!("\n{}", solution.name);
        println!("  {}", solution.description);
        for (i, step) in solution.implementation_steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
        for assumption in &solution.assumptions {
            println!("  - assumes: {}", assumption);
        }
    }

    println!("\n### Trade-off Matrix");
    println!(
        "{:<15} {:<8} {:<10} {:<10} {:<8} {:<6}",
        "Solution", "Perf", "Maintain", "Security", "Cost", "Score"
    );
    println!("{}", "-".repeat(62));
    for candidate in &by_position {
        let a = &candidate.analysis;
        println!(
            "{:<15} {:<8} {:<10} {:<10} {:<8} {:<6}",
            a.solution_name, a.performance, a.maintainability, a.security, a.cost, candidate.score
        );
    }

    println!("\n### Risk Assessment");
    for candidate in &by_position {
        println!("\n{} risks:", candidate.analysis.solution_name);
        for risk in &candidate.analysis.risks {
            println!("  - {}", risk);
        }
    }

    let rec = &record.recommendation;
    println!("\n### Recommendation");
    println!("Primary choice: {}", rec.primary_choice);
    println!("Rationale: {}", rec.rationale);
    println!("Alternative: {}", rec.alternative);

    println!("\n### Implementation Guidance");
    for guidance in &rec.implementation_guidance {
        println!("  - {}", guidance);
    }

    println!("\n### Patterns Learned");
    for pattern in &rec.patterns_learned {
        println!("  - {}", pattern);
    }

    println!("\n### Evolved Context Playbook");
    println!(
        "{} successful pattern(s):",
        record.playbook.successful_patterns.len()
    );
    for pattern in &record.playbook.successful_patterns {
        println!("  ✓ {}", pattern);
    }
    if !record.playbook.common_pitfalls.is_empty() {
        println!("Common pitfalls:");
        for pitfall in &record.playbook.common_pitfalls {
            println!("  ✗ {}", pitfall);
        }
    }
    if !record.playbook.domain_knowledge.is_empty() {
        println!("Domain knowledge:");
        for item in &record.playbook.domain_knowledge {
            println!("  • {}", item);
        }
    }
    println!();
}
