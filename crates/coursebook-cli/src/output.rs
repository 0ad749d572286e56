//! Output layer for pretty/text/JSON parity.
//!
//! Every command result is rendered in one of three modes: pretty output for
//! people at a terminal, compact text rows for pipes, or one JSON object per
//! result for scripts.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format`, then `--json`
//! 2. `COURSEBOOK_FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output` in the config file
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use coursebook_core::command::{CommandResult, Directive};
use coursebook_core::manager::Model;
use coursebook_core::model::{Person, Tag};
use coursebook_core::session::SessionError;
use coursebook_core::view::CourseEntry;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Environment variable that picks the output mode.
pub const FORMAT_ENV: &str = "COURSEBOOK_FORMAT";

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, visual framing).
    Pretty,
    /// Plain rows for pipes and scripts that grep.
    Text,
    /// Machine-readable JSON, one object per command.
    Json,
}

impl OutputMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    /// Accept the mode names people put in env vars and config files.
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some(Self::Pretty),
            "text" | "plain" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    config_output: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    // Unknown names fall through to the next source.
    if let Some(mode) = [format_env, config_output]
        .into_iter()
        .flatten()
        .find_map(OutputMode::from_name)
    {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from flags, [`FORMAT_ENV`], the config file and
/// whether stdout is a terminal.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    config_output: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var(FORMAT_ENV).ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        config_output,
        is_tty,
    )
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Anything shown as one entry of a list in pretty or text mode.
pub trait Renderable {
    /// Several labelled lines for people.
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()>;

    /// One row, fields in [`Renderable::table_headers`] order.
    fn render_table(&self, w: &mut dyn Write) -> io::Result<()>;

    fn table_headers() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}

/// A person with their one-based position in the visible list.
#[derive(Debug, Serialize)]
pub struct PersonRow<'a> {
    pub index: usize,
    #[serde(flatten)]
    pub person: &'a Person,
}

fn tags_text(person: &Person) -> String {
    person
        .tags()
        .iter()
        .map(Tag::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn courses_text(person: &Person) -> String {
    person
        .courses()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Renderable for PersonRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let person = self.person;
        let star = if person.is_favourite() { " ★" } else { "" };
        writeln!(w, "{:>3}. {}{star}", self.index, person.name())?;
        writeln!(w, "     {} · {}", person.phone(), person.email())?;
        writeln!(w, "     {}", person.address())?;
        if let Some(birthday) = person.birthday() {
            writeln!(w, "     birthday {birthday}")?;
        }
        if !person.tags().is_empty() {
            writeln!(w, "     tags     {}", tags_text(person))?;
        }
        if !person.courses().is_empty() {
            writeln!(w, "     courses  {}", courses_text(person))?;
        }
        Ok(())
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let person = self.person;
        writeln!(
            w,
            "{}  {}  {}  {}  {}  {}  {}",
            self.index,
            person.name(),
            person.phone(),
            person.email(),
            person.birthday().map_or_else(|| "-".to_string(), |b| b.to_string()),
            if person.is_favourite() { "fav" } else { "-" },
            courses_text(person),
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["#", "NAME", "PHONE", "EMAIL", "BIRTHDAY", "FAV", "COURSES"]
    }
}

impl Renderable for CourseEntry {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let noun = if self.takers == 1 { "person" } else { "persons" };
        writeln!(
            w,
            "  {:<10} {:<7} {} {noun}",
            self.code.as_str(),
            self.color.as_str(),
            self.takers
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}  {}", self.code, self.color, self.takers)
    }

    fn table_headers() -> &'static [&'static str] {
        &["CODE", "COLOR", "TAKERS"]
    }
}

/// Render rows sequentially; text mode gets a header line first.
pub fn render_list<R: Renderable>(
    w: &mut dyn Write,
    items: &[R],
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            if !items.is_empty() {
                writeln!(w, "{}", R::table_headers().join("  "))?;
            }
            for item in items {
                item.render_table(w)?;
            }
        }
        OutputMode::Pretty | OutputMode::Json => {
            for item in items {
                item.render_human(w)?;
            }
        }
    }
    Ok(())
}

fn person_rows(model: &Model) -> Vec<PersonRow<'_>> {
    model
        .filtered_persons()
        .into_iter()
        .enumerate()
        .map(|(i, person)| PersonRow {
            index: i + 1,
            person,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonResult<'a> {
    ok: bool,
    feedback: &'a str,
    directive: &'a Directive,
    #[serde(skip_serializing_if = "Option::is_none")]
    persons: Option<Vec<PersonRow<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    courses: Option<Vec<CourseEntry>>,
}

/// Render a successful command: its feedback, then whatever its directive
/// asks to be shown.
pub fn render_result(
    w: &mut dyn Write,
    mode: OutputMode,
    result: &CommandResult,
    model: &Model,
) -> anyhow::Result<()> {
    if mode.is_json() {
        let value = JsonResult {
            ok: true,
            feedback: &result.feedback,
            directive: &result.directive,
            persons: matches!(result.directive, Directive::ShowPersons)
                .then(|| person_rows(model)),
            courses: matches!(result.directive, Directive::ShowCourses)
                .then(|| model.filtered_courses()),
        };
        serde_json::to_writer(&mut *w, &value)?;
        writeln!(w)?;
        return Ok(());
    }

    writeln!(w, "{}", result.feedback)?;
    match &result.directive {
        Directive::ShowPersons => {
            let rows = person_rows(model);
            if mode == OutputMode::Pretty && !rows.is_empty() {
                pretty_rule(w)?;
            }
            render_list(w, &rows, mode)?;
        }
        Directive::ShowCourses => {
            let courses = model.filtered_courses();
            if mode == OutputMode::Pretty {
                pretty_section(w, "Courses")?;
            }
            render_list(w, &courses, mode)?;
        }
        Directive::ShowPerson { person } => render_person(w, mode, person)?,
        Directive::ChangeTheme { stylesheet, .. } => {
            if mode == OutputMode::Pretty {
                pretty_kv(w, "stylesheet", stylesheet)?;
            }
        }
        Directive::None
        | Directive::ShowHelp
        | Directive::Exit
        | Directive::PendingConfirmation(_) => {}
    }
    Ok(())
}

fn render_person(w: &mut dyn Write, mode: OutputMode, person: &Person) -> io::Result<()> {
    if mode == OutputMode::Pretty {
        pretty_section(w, person.name().as_str())?;
    } else {
        pretty_kv(w, "name", person.name().as_str())?;
    }
    pretty_kv(w, "phone", person.phone().as_str())?;
    pretty_kv(w, "email", person.email().as_str())?;
    pretty_kv(w, "address", person.address().as_str())?;
    if let Some(birthday) = person.birthday() {
        pretty_kv(w, "birthday", birthday.to_string())?;
    }
    if !person.tags().is_empty() {
        pretty_kv(w, "tags", tags_text(person))?;
    }
    if !person.courses().is_empty() {
        pretty_kv(w, "courses", courses_text(person))?;
    }
    pretty_kv(w, "favourite", if person.is_favourite() { "yes" } else { "no" })
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A rejected command as shown to the user.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    pub error_code: &'static str,
    /// Short name of the error class, the same for every error with this code.
    pub summary: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl From<&SessionError> for CliError {
    fn from(err: &SessionError) -> Self {
        let code = err.code();
        Self {
            message: err.to_string(),
            error_code: code.code(),
            summary: code.message(),
            hint: code.hint(),
        }
    }
}

pub fn render_error(w: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "ok": false,
                "error": error,
            });
            serde_json::to_writer(&mut *w, &wrapper)?;
            writeln!(w)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(w, "error[{}]: {}", error.error_code, error.message)?;
            if let Some(hint) = error.hint {
                writeln!(w, "  hint: {hint}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursebook_core::book::CourseBook;
    use coursebook_core::model::Theme;
    use coursebook_core::session::Session;
    use coursebook_core::storage::MemoryStorage;
    use serde_json::Value;

    fn session() -> Session<MemoryStorage> {
        let mut session =
            Session::open(MemoryStorage::with_book(CourseBook::new()), false);
        session
            .execute("add n/Amy Bee p/85355255 e/amy@example.com a/Block 1 c/CS2103T,RED t/friend")
            .unwrap();
        session
    }

    fn rendered(mode: OutputMode, session: &mut Session<MemoryStorage>, input: &str) -> String {
        let result = session.execute(input).unwrap();
        let mut buf = Vec::new();
        render_result(&mut buf, mode, &result, session.model()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn mode_names_round_trip() {
        for mode in [OutputMode::Pretty, OutputMode::Text, OutputMode::Json] {
            assert_eq!(OutputMode::from_name(mode.as_str()), Some(mode));
        }
        assert_eq!(OutputMode::from_name(" Human "), Some(OutputMode::Pretty));
        assert_eq!(OutputMode::from_name("plain"), Some(OutputMode::Text));
        assert_eq!(OutputMode::from_name("yaml"), None);
    }

    #[test]
    fn format_flag_beats_json_flag() {
        let mode = resolve_output_mode_inner(Some(OutputMode::Text), true, Some("json"), None, true);
        assert_eq!(mode, OutputMode::Text);
        let mode = resolve_output_mode_inner(None, true, Some("pretty"), None, true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn env_then_config_then_tty() {
        let mode = resolve_output_mode_inner(None, false, Some("text"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
        let mode = resolve_output_mode_inner(None, false, Some("bogus"), Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
        assert_eq!(
            resolve_output_mode_inner(None, false, None, None, true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, None, Some("bogus"), false),
            OutputMode::Text
        );
    }

    #[test]
    fn text_list_has_header_and_rows() {
        let mut session = session();
        let out = rendered(OutputMode::Text, &mut session, "list");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Listed all persons");
        assert!(lines[1].starts_with("#  NAME"));
        assert!(lines[2].starts_with("1  Amy Bee  85355255"));
        assert!(lines[2].ends_with("CS2103T (RED)"));
    }

    #[test]
    fn json_list_embeds_persons() {
        let mut session = session();
        let out = rendered(OutputMode::Json, &mut session, "list");
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["directive"]["kind"], "show_persons");
        assert_eq!(json["persons"][0]["index"], 1);
        assert_eq!(json["persons"][0]["name"], "Amy Bee");
        assert!(json.get("courses").is_none());
    }

    #[test]
    fn json_courses_embed_roster() {
        let mut session = session();
        let out = rendered(OutputMode::Json, &mut session, "courses");
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["courses"][0]["code"], "CS2103T");
        assert_eq!(json["courses"][0]["color"], "RED");
        assert_eq!(json["courses"][0]["takers"], 1);
    }

    #[test]
    fn pretty_view_shows_details() {
        let mut session = session();
        let out = rendered(OutputMode::Pretty, &mut session, "view 1");
        assert!(out.contains("Viewing Amy Bee"));
        assert!(out.contains("phone:"));
        assert!(out.contains("friend"));
    }

    #[test]
    fn errors_carry_codes() {
        let mut session = session();
        let err = session.execute("delete 9").unwrap_err();
        let cli_error = CliError::from(&err);
        assert_eq!(cli_error.error_code, "E2003");

        let mut buf = Vec::new();
        render_error(&mut buf, OutputMode::Json, &cli_error).unwrap();
        let json: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["error_code"], "E2003");
        assert_eq!(json["error"]["summary"], "Index out of range");
        assert!(json["error"]["hint"].is_string());

        let mut text = Vec::new();
        render_error(&mut text, OutputMode::Text, &cli_error).unwrap();
        assert!(String::from_utf8(text).unwrap().starts_with("error[E2003]:"));
    }

    #[test]
    fn theme_result_is_plain_feedback_in_text() {
        let mut session = session();
        let out = rendered(OutputMode::Text, &mut session, "theme light");
        assert_eq!(out, "Theme changed to light\n");
        assert_eq!(session.model().theme(), Theme::Light);
    }
}
