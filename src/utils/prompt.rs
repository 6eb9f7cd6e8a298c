use std::io::{BufRead, Write};

use colored::Colorize;
use eyre::{Result, bail};
use log::info;

use crate::session::Session;

const CLEAR_COMMAND: &str = ":clear";

/// Asks for the job title until a non-empty one is entered. Prompts go to
/// `out`, which keeps them apart from the report on stdout.
pub fn prompt_role(input: &mut impl BufRead, out: &mut impl Write) -> Result<String> {
    loop {
        write!(out, "{}", "Enter your job title (e.g. Data Analyst): ".cyan())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("no job title provided");
        }

        let role = line.trim();
        if !role.is_empty() {
            return Ok(role.to_string());
        }
        writeln!(out, "{}", "The job title cannot be empty.".red())?;
    }
}

/// Interactive skill entry: comma-separated skills per line, `:clear` to
/// start over, an empty line to finish.
pub fn collect_skills(
    session: &mut Session,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "\n{}", "=== Your Skills ===".cyan().bold())?;
    writeln!(
        out,
        "{}",
        "Enter skills separated by commas (e.g. Python, SQL, React).".cyan()
    )?;
    writeln!(
        out,
        "{}\n",
        format!("Press Enter on an empty line to finish, '{}' to start over.", CLEAR_COMMAND).cyan()
    )?;

    loop {
        write!(out, "{}", "Skills: ".cyan())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            if session.skills().is_empty() {
                writeln!(out, "{}", "Please enter at least one skill.".yellow())?;
                continue;
            }
            break;
        }

        if line.eq_ignore_ascii_case(CLEAR_COMMAND) {
            session.clear_skills();
            writeln!(out, "{}", "Cleared all skills.".yellow())?;
            continue;
        }

        apply_line(session, line, out)?;
        writeln!(out, "   {}", session.skills().join(", ").green())?;
    }

    info!("collected {} skills", session.skills().len());
    Ok(())
}

fn apply_line(session: &mut Session, line: &str, out: &mut impl Write) -> Result<()> {
    for raw in line.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        if !session.add_skill(raw) {
            writeln!(out, "{}", format!("⊘ Skipped: {}", raw).yellow())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;

    #[test]
    fn test_collects_until_empty_line() {
        let mut session = Session::new("Analyst", None);
        let mut input = Cursor::new("Python, SQL\npython\n\nExcel\n");

        collect_skills(&mut session, &mut input, &mut io::sink()).unwrap();

        assert_eq!(session.skills(), ["Python", "SQL"]);
    }

    #[test]
    fn test_clear_command_starts_over() {
        let mut session = Session::new("Analyst", None);
        let mut input = Cursor::new("Python\n:CLEAR\nGo\n\n");

        collect_skills(&mut session, &mut input, &mut io::sink()).unwrap();

        assert_eq!(session.skills(), ["Go"]);
    }

    #[test]
    fn test_empty_line_before_any_skill_keeps_asking() {
        let mut session = Session::new("Analyst", None);
        let mut input = Cursor::new("\n\nRust\n\n");

        collect_skills(&mut session, &mut input, &mut io::sink()).unwrap();

        assert_eq!(session.skills(), ["Rust"]);
    }

    #[test]
    fn test_end_of_input_stops_collection() {
        let mut session = Session::new("Analyst", None);
        let mut input = Cursor::new("");

        collect_skills(&mut session, &mut input, &mut io::sink()).unwrap();

        assert!(session.skills().is_empty());
    }

    #[test]
    fn test_role_prompt_skips_blank_lines() {
        let mut input = Cursor::new("  \n Data Analyst \n");
        assert_eq!(prompt_role(&mut input, &mut io::sink()).unwrap(), "Data Analyst");

        let mut input = Cursor::new("");
        assert!(prompt_role(&mut input, &mut io::sink()).is_err());
    }

    #[test]
    fn test_prompts_go_to_the_given_writer() {
        let mut session = Session::new("Analyst", None);
        let mut input = Cursor::new("Data Analyst\nSQL, sql\n\n");
        let mut out = Vec::new();

        let role = prompt_role(&mut input, &mut out).unwrap();
        collect_skills(&mut session, &mut input, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(role, "Data Analyst");
        assert!(out.contains("Enter your job title"));
        assert!(out.contains("Skills: "));
        assert!(out.contains("Skipped: sql"));
    }
}
