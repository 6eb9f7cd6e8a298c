mod models;
mod pipeline;
mod report;
mod scraper;
mod session;
mod skills;
mod utils;

use std::error::Error as _;
use std::io;
use std::process;

use clap::Parser;
use colored::Colorize;
use eyre::Result;
use log::{debug, info, warn};

use crate::pipeline::{Pipeline, PipelineSettings};
use crate::report::{Report, write_failure};
use crate::scraper::easyoffer::EasyOfferScraper;
use crate::scraper::hh::HhScraper;
use crate::session::Session;
use crate::skills::content::ContentLibrary;
use crate::skills::vocabulary::SkillVocabulary;
use crate::utils::cli::Args;
use crate::utils::config::config;
use crate::utils::log::Logger;
use crate::utils::prompt;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    Logger::init(args.verbosity);

    info!(
        "starting skillmatch {}",
        format!("v{}", env!("CARGO_PKG_VERSION")).magenta()
    );

    let config = config(args.config.clone())?;
    let config = (*config).clone().with_overrides(&args)?;

    let session = build_session(&args)?;
    debug!("session: {:?}", session);

    let vocabulary = SkillVocabulary::new(&config.vocabulary.skills)?;
    if vocabulary.is_empty() {
        warn!("skill vocabulary is empty; only structured tags will be counted");
    } else {
        info!("loaded {} vocabulary skills", vocabulary.len());
    }
    let content = ContentLibrary::new(&config.content, &config.recommendations.course_search_url)?;
    let vacancies = HhScraper::new(config.fetch.clone())?;
    let questions = if config.interview.enabled {
        Some(EasyOfferScraper::new(&config.fetch, &config.interview.source_url)?)
    } else {
        None
    };

    let pipeline = Pipeline::new(
        &vacancies,
        questions.as_ref(),
        &vocabulary,
        &content,
        PipelineSettings::from(&config),
    );

    let analysis = match pipeline.run(&session).await {
        Ok(analysis) => analysis,
        Err(err) => {
            if let Some(source) = err.source() {
                warn!("{}", source);
            }
            write_failure(&mut io::stderr().lock(), &err)?;
            process::exit(1);
        }
    };

    let report = Report::new(session.skills().to_vec(), analysis);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }

    Ok(())
}

fn build_session(args: &Args) -> Result<Session> {
    let mut input = io::stdin().lock();
    let mut prompts = io::stderr().lock();

    let role = match args.role.as_deref().map(str::trim) {
        Some(role) if !role.is_empty() => role.to_string(),
        _ => prompt::prompt_role(&mut input, &mut prompts)?,
    };

    let mut session = Session::new(role, args.level);
    for skill in &args.skills {
        session.add_skill(skill);
    }

    if session.skills().is_empty() {
        prompt::collect_skills(&mut session, &mut input, &mut prompts)?;
    }

    Ok(session)
}
