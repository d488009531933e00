//! Parsing of the line-oriented commands typed at the prompt.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(usize),
    Rename(usize, String),
    Delete(usize),
    ClearCompleted,
    List,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command {0:?}; type `help`")]
    Unknown(String),

    #[error("`{0}` needs {1}")]
    MissingArgument(&'static str, &'static str),

    #[error("{0:?} is not a row number")]
    BadRow(String),
}

pub const HELP: &str = "\
commands:
  add <title>          add an item
  done <n>             toggle completion of row n
  rename <n> <title>   change the title of row n
  rm <n>               delete row n
  clear                delete all completed items
  ls                   show the list
  help                 show this help
  quit                 leave";

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word {
            "add" | "a" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("add", "a title"));
                }
                Ok(Command::Add(rest.to_string()))
            }
            "done" | "toggle" | "d" => Ok(Command::Toggle(row_number("done", rest)?)),
            "rm" | "delete" => Ok(Command::Delete(row_number("rm", rest)?)),
            "rename" | "mv" => {
                let (row, title) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument("rename", "a row and a title"))?;
                Ok(Command::Rename(row_number("rename", row)?, title.trim().to_string()))
            }
            "clear" => Ok(Command::ClearCompleted),
            "ls" | "list" | "" => Ok(Command::List),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn row_number(command: &'static str, arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument(command, "a row number"));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadRow(arg.to_string())),
    }
}
