// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (common-dialog
// FFI).  Each unsafe block there MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

mod app;
mod editor;
mod error;
mod files;
mod gutter;
mod keymap;
mod logging;
mod platform;
mod render;
mod settings;

use std::{ffi::OsString, io::Write, path::PathBuf};

use app::App;
use files::DiskFiles;
use settings::Settings;

const USAGE: &str = "\
usage: spacemark [FILE]
       spacemark --markup FILE

  FILE            open FILE on startup
  --markup FILE   print FILE with its whitespace marked up and exit";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Edit(Option<PathBuf>),
    Markup(PathBuf),
    Help,
}

fn parse_args(args: impl IntoIterator<Item = OsString>) -> Result<Invocation, String> {
    let mut args = args.into_iter();
    let Some(first) = args.next() else {
        return Ok(Invocation::Edit(None));
    };
    let invocation = match first.to_str() {
        Some("-h" | "--help") => Invocation::Help,
        Some("--markup") => match args.next() {
            Some(path) => Invocation::Markup(PathBuf::from(path)),
            None => return Err("--markup needs a file".to_owned()),
        },
        Some(flag) if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
        _ => Invocation::Edit(Some(PathBuf::from(&first))),
    };
    match args.next() {
        Some(extra) => Err(format!("unexpected argument {}", extra.to_string_lossy())),
        None => Ok(invocation),
    }
}

fn main() {
    let invocation = match parse_args(std::env::args_os().skip(1)) {
        Ok(invocation) => invocation,
        Err(msg) => {
            eprintln!("spacemark: {msg}\n{USAGE}");
            std::process::exit(2);
        }
    };

    let settings = Settings::load();
    let guard = logging::init(settings::config_dir().as_deref(), &settings.log_level);

    let result = match invocation {
        Invocation::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Invocation::Markup(path) => print_markup(path),
        Invocation::Edit(path) => edit(settings, path),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "spacemark failed");
        // Flush the log before exiting; `exit` skips destructors.
        drop(guard);
        eprintln!("spacemark: {e}");
        std::process::exit(1);
    }
}

fn edit(mut settings: Settings, path: Option<PathBuf>) -> error::Result<()> {
    let mut app = App::new(&settings);
    platform::terminal::run(&mut app, path)?;

    if settings.font_size != app.font_size() {
        settings.font_size = app.font_size();
        if let Err(e) = settings.save() {
            tracing::warn!(error = %e, "could not save settings");
        }
    }
    Ok(())
}

fn print_markup(path: PathBuf) -> error::Result<()> {
    let text = DiskFiles::new().read(&path)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", render::annotate(&text).to_markup())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation, String> {
        parse_args(args.iter().map(OsString::from))
    }

    #[test]
    fn no_arguments_opens_untitled() {
        assert_eq!(parse(&[]), Ok(Invocation::Edit(None)));
    }

    #[test]
    fn positional_path_is_opened() {
        assert_eq!(
            parse(&["notes.txt"]),
            Ok(Invocation::Edit(Some(PathBuf::from("notes.txt"))))
        );
    }

    #[test]
    fn markup_export() {
        assert_eq!(
            parse(&["--markup", "a.txt"]),
            Ok(Invocation::Markup(PathBuf::from("a.txt")))
        );
        assert!(parse(&["--markup"]).is_err());
    }

    #[test]
    fn rejects_unknown_and_extra_arguments() {
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["a.txt", "b.txt"]).is_err());
        assert_eq!(parse(&["--help"]), Ok(Invocation::Help));
    }
}
