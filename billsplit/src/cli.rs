use std::borrow::Cow;

pub type CliResult<T> = Result<T, Cow<'static, str>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show { path: String, detailed: bool },
    Save { path: String, name: String },
    History,
    Recall { id: String, detailed: bool },
    Forget { id: String },
}

const DETAILED_FLAG: &str = "--detailed";

/// Parses the arguments that follow the program name.
///
/// `--detailed` may appear anywhere for `show` and `recall`; a split name for `save` may
/// span several arguments.
pub fn parse_args<I, S>(args: I) -> CliResult<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args: Vec<String> = args.into_iter().map(Into::into).collect();
    if args.is_empty() {
        return Err(usage());
    }
    let command = args.remove(0);

    let detailed = match command.as_str() {
        "show" | "recall" => {
            let before = args.len();
            args.retain(|arg| arg != DETAILED_FLAG);
            args.len() != before
        }
        _ => false,
    };

    match (command.as_str(), args.as_slice()) {
        ("show", [path]) => Ok(Command::Show {
            path: path.clone(),
            detailed,
        }),
        ("save", [path, name @ ..]) if !name.is_empty() => {
            let name = name.join(" ");
            if name.trim().is_empty() {
                return Err(usage());
            }
            Ok(Command::Save {
                path: path.clone(),
                name,
            })
        }
        ("history", []) => Ok(Command::History),
        ("recall", [id]) => Ok(Command::Recall {
            id: id.clone(),
            detailed,
        }),
        ("forget", [id]) => Ok(Command::Forget { id: id.clone() }),
        _ => Err(usage()),
    }
}

fn usage() -> Cow<'static, str> {
    Cow::Borrowed(billsplit_i18n::USAGE)
}
