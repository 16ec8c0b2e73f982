pub mod commands;
pub mod session_file;

use std::io::Write;

/// Print `prompt` and read one line from stdin. `None` at end of input.
pub fn try_readline(prompt: &str) -> Result<Option<String>, String> {
    write!(std::io::stdout(), "{prompt}").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())?;
    let mut buffer = String::new();
    let read = std::io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(buffer.trim_end_matches(['\r', '\n']).to_string()))
}

/// Like [`try_readline`], but end of input is an error.
pub fn readline(prompt: &str) -> Result<String, String> {
    try_readline(prompt)?.ok_or_else(|| "error: unexpected end of input".to_string())
}

/// Where interactive answers come from.
pub trait Prompt {
    /// A visible answer.
    fn line(&mut self, prompt: &str) -> Result<String, String>;

    /// A hidden answer, such as a password.
    fn secret(&mut self, prompt: &str) -> Result<String, String>;
}

/// Prompts on the controlling terminal.
pub struct Terminal;

impl Prompt for Terminal {
    fn line(&mut self, prompt: &str) -> Result<String, String> {
        readline(&format!("{prompt}: "))
    }

    fn secret(&mut self, prompt: &str) -> Result<String, String> {
        read_password(prompt)
    }
}

/// Read a password without echoing it to the terminal.
pub fn read_password(prompt: &str) -> Result<String, String> {
    dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| e.to_string())
}
