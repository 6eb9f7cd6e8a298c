use std::io::{self, Write};

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::pipeline::{Analysis, PipelineError};
use crate::skills::matcher::{MatchOutcome, MatchResult, RankedSkill};
use crate::skills::recommend::Recommendation;

const BUCKETS: usize = 10;
const BAR_WIDTH: usize = 30;

#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub analysis: Analysis,
}

impl Report {
    pub fn new(skills: Vec<String>, analysis: Analysis) -> Self {
        Self {
            generated_at: Utc::now(),
            skills,
            analysis,
        }
    }

    pub fn print(&self) {
        let analysis = &self.analysis;
        let result = match &analysis.outcome {
            MatchOutcome::NoData => {
                println!(
                    "\n{}",
                    format!(
                        "No postings found for \"{}\". Try a broader job title or another level.",
                        analysis.query.search_text()
                    )
                    .yellow()
                );
                return;
            }
            MatchOutcome::Scored(result) => result,
        };

        let ready = analysis
            .recommendation
            .as_ref()
            .is_some_and(Recommendation::is_interview);
        let headline = if ready {
            "You're ready for the interview!".green().bold()
        } else {
            "You might need to learn a bit more".yellow().bold()
        };

        println!("\n{}", headline);
        println!(
            "Similarity score: {} across {} postings",
            format!("{:.2}", result.score()).bold(),
            analysis.total_postings
        );

        print_skills(result);

        if !analysis.distribution.is_empty() {
            println!("\n{}", "Skill match distribution".cyan().bold());
            for line in histogram(&analysis.distribution) {
                println!("{}", line);
            }
        }

        match &analysis.recommendation {
            Some(Recommendation::InterviewQuestions(items)) => {
                println!("\n{}", "Suggested interview questions".cyan().bold());
                for item in items.iter().filter(|i| !i.questions.is_empty()) {
                    println!("{}", item.skill.as_str().bold());
                    for question in &item.questions {
                        println!("  - {}", question);
                    }
                }
                for question in &analysis.role_questions {
                    println!("  - {}", question);
                }

                if !analysis.top_vacancies.is_empty() {
                    println!("\n{}", "Top matching vacancies".cyan().bold());
                    for vacancy in &analysis.top_vacancies {
                        println!(
                            "  {} ({:.0}%) {}",
                            vacancy.title.bold(),
                            vacancy.precision * 100.0,
                            vacancy.url.as_deref().unwrap_or("").blue()
                        );
                    }
                }
            }
            Some(Recommendation::Courses(items)) => {
                if let Some(url) = &analysis.role_course {
                    println!("\n{}", "Recommended course for your role".cyan().bold());
                    println!("  {}", url.blue());
                }
                println!("\n{}", "Recommended courses by missing skill".cyan().bold());
                for item in items {
                    for course in &item.courses {
                        println!(
                            "  - {}: {} {}",
                            item.skill.as_str().bold(),
                            course.title,
                            course.url.blue()
                        );
                    }
                }
            }
            None => {}
        }
    }
}

fn print_skills(result: &MatchResult) {
    let list = |skills: &[RankedSkill]| {
        skills
            .iter()
            .map(|s| format!("{} ({:.0}%)", s.skill, s.weight * 100.0))
            .collect::<Vec<_>>()
            .join(", ")
    };

    if !result.matched().is_empty() {
        println!("{} {}", "Matched:".green(), list(result.matched()));
    }
    if !result.gaps().is_empty() {
        println!("{} {}", "Missing:".red(), list(result.gaps()));
    }
}

/// Ten fixed-width buckets over `[0, 1]`; a precision of exactly 1.0 lands
/// in the last one.
pub fn bucket_counts(precisions: &[f64]) -> [usize; BUCKETS] {
    let mut counts = [0; BUCKETS];
    for &precision in precisions {
        let idx = ((precision.clamp(0.0, 1.0) * BUCKETS as f64) as usize).min(BUCKETS - 1);
        counts[idx] += 1;
    }
    counts
}

fn histogram(precisions: &[f64]) -> Vec<String> {
    let counts = bucket_counts(precisions);
    let max = counts.iter().copied().max().unwrap_or(0).max(1);

    counts
        .iter()
        .enumerate()
        .map(|(idx, &count)| {
            let width = count * BAR_WIDTH / max;
            format!(
                "  {:.1}-{:.1} | {} {}",
                idx as f64 / BUCKETS as f64,
                (idx + 1) as f64 / BUCKETS as f64,
                "█".repeat(width).blue(),
                count
            )
        })
        .collect()
}

/// Message and hint for a run that produced no analysis.
pub fn write_failure(out: &mut impl Write, err: &PipelineError) -> io::Result<()> {
    writeln!(out, "{}", err.to_string().red().bold())?;
    writeln!(out, "{}", err.hint().yellow())
}
