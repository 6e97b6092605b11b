use clap::{Arg, ArgAction, ArgMatches, Command};
use fte_core::estimates::calendar_self_check;
use fte_core::{
    find_epics_parents, gather_epics_with, update_initiative_estimates, Context, EpicQuery,
    FteFields, Issue, IssueTracker, JiraClient, Result,
};
use tracing::info;

mod logging;

fn cli() -> Command {
    Command::new("initiative_estimates")
        .version("0.1.0")
        .about("Compare summed Epic estimates with the FTE values cached on Initiatives")
        .author("FTE Estimates Team")
        .arg(
            Arg::new("initiatives_only")
                .short('i')
                .action(ArgAction::SetTrue)
                .help("Show Initiatives only"),
        )
        .arg(
            Arg::new("project")
                .short('p')
                .long("project")
                .value_name("PROJECT")
                .help("Project key (SWG, VIRT, KWG etc)"),
        )
        .arg(
            Arg::new("stories")
                .short('s')
                .action(ArgAction::SetTrue)
                .help("Show stories also"),
        )
        .arg(
            Arg::new("test_server")
                .short('t')
                .action(ArgAction::SetTrue)
                .help("Use the test server"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Output some verbose debugging info"),
        )
        .arg(
            Arg::new("all")
                .long("all")
                .action(ArgAction::SetTrue)
                .help("Load all issues, not just the ones in progress"),
        )
        .arg(
            Arg::new("desc")
                .long("desc")
                .action(ArgAction::SetTrue)
                .help("Add description to the issues"),
        )
        .arg(
            Arg::new("self_test")
                .long("test")
                .action(ArgAction::SetTrue)
                .help("Run the built-in self check and then exit"),
        )
}

fn epic_query(matches: &ArgMatches, ctx: &Context) -> EpicQuery {
    EpicQuery {
        include_stories: matches.get_flag("stories"),
        all_statuses: matches.get_flag("all"),
        ..EpicQuery::new(&ctx.project)
    }
}

fn epic_listing(epic: &Issue, with_description: bool) -> String {
    if !with_description {
        return epic.to_string();
    }

    let mut line = match epic.fields.summary.as_deref() {
        Some(summary) => format!("{}: {}", epic, summary),
        None => epic.to_string(),
    };
    if let Some(description) = epic.fields.description.as_deref() {
        for desc_line in description.lines().filter(|l| !l.trim().is_empty()) {
            line.push_str("\n    ");
            line.push_str(desc_line.trim_end());
        }
    }
    line
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    logging::init(if matches.get_flag("verbose") { "debug" } else { "info" });

    let start_time = std::time::Instant::now();

    // Initialize context from config file and environment
    let mut ctx = Context::load()?;

    // Override project if provided via command line
    if let Some(project) = matches.get_one::<String>("project") {
        ctx.project = project.clone();
    }

    if ctx.ctx_out {
        info!("Context: {:?}", ctx);
    }

    if let Some(path) = &ctx.config_file {
        info!("Using config file: {}", path.display());
    }

    if matches.get_flag("self_test") {
        calendar_self_check()?;
        println!("Self check passed");
        return Ok(());
    }

    let (client, username) = JiraClient::login(&ctx, matches.get_flag("test_server")).await?;
    info!("Logged in as {}", username);

    let query = epic_query(&matches, &ctx);
    let epics = gather_epics_with(&client, &query).await?;

    if !matches.get_flag("initiatives_only") {
        let with_description = matches.get_flag("desc");
        for epic in &epics {
            println!("{}", epic_listing(epic, with_description));
        }
    }

    println!("Processing all Epics found by JQL query:\n  '{}'", query.jql());
    let initiatives = find_epics_parents(&client, &epics).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = update_initiative_estimates(&client, &initiatives, &FteFields::from(&ctx), &mut out).await?;

    client.close().await?;

    info!(
        "Reported {} Initiative(s) from {} Epic(s) in {:?}",
        report.len(),
        epics.len(),
        start_time.elapsed()
    );

    Ok(())
}
