use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal, Write};
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "STEGPASS_PASSWORD";

/// Reads the password for decoding.
pub fn read_password() -> Result<Zeroizing<String>> {
    read_password_from_sources("Enter password for decryption: ", false)
}

/// Reads the password for encoding. An interactive prompt asks twice.
pub fn read_new_password() -> Result<Zeroizing<String>> {
    read_password_from_sources("Enter password for encryption: ", true)
}

fn read_password_from_sources(prompt: &str, confirm: bool) -> Result<Zeroizing<String>> {
    //  Environment Variable
    //  STEGPASS_PASSWORD="supersecret" stegpass decode -i out.png
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    //  stdin (Pipeline)
    //  echo "supersecret" | stegpass decode -i out.png
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().lock().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
        bail!("No password provided");
    }

    //  Interactive (TTY)
    let pw = Zeroizing::new(rpassword::prompt_password(prompt)?);
    if pw.is_empty() {
        bail!("password cannot be empty");
    }

    if confirm {
        let again = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);
        if pw != again {
            bail!("passwords do not match");
        }
    }

    Ok(pw)
}

/// Reads the secret message when it was not given on the command line.
///
/// Must run before [`read_password`] so that piped input is read as
/// message first, password second.
pub fn read_message() -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        print!("Enter secret message: ");
        io::stdout().flush()?;
    }

    let mut message = String::new();
    stdin.lock().read_line(&mut message)?;
    trim_newline(&mut message);

    if message.is_empty() {
        bail!("message cannot be empty");
    }
    Ok(message)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_newline_strips_crlf_only() {
        let mut s = String::from("  pw with spaces \r\n");
        trim_newline(&mut s);
        assert_eq!(s, "  pw with spaces ");
    }
}
