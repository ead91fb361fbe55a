use std::io::{self, BufRead, Write};

const KEY_PROMPT: &str = "Enter your Gemini API key: ";

/// Reads one line from stdin after printing the key prompt.
pub fn prompt_api_key() -> io::Result<String> {
    println!("🔐 AI Tutor Authentication Setup");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Create a key for a Google Cloud project with the Gemini API enabled.");
    println!("Billing information: https://ai.google.dev/gemini-api/docs/billing");
    println!();

    let stdin = io::stdin();
    read_key(&mut stdin.lock(), &mut io::stdout())
}

fn read_key<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "{KEY_PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_key_prints_prompt_and_strips_newline() {
        let mut input = Cursor::new(b"AIzaSyExample\r\n".to_vec());
        let mut output = Vec::new();
        let key = read_key(&mut input, &mut output).expect("read");
        assert_eq!(key, "AIzaSyExample");
        assert_eq!(String::from_utf8(output).unwrap(), KEY_PROMPT);
    }
}
