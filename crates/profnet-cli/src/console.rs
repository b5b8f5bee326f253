use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Line-oriented terminal I/O over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    /// Print `label` and read one line without its line ending. `None` once
    /// input is exhausted.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(Some(line))
    }

    /// Keep asking until a number comes back.
    pub fn read_choice(&mut self) -> io::Result<Option<u32>> {
        loop {
            let Some(line) = self.prompt("Please make your choice: ")? else {
                return Ok(None);
            };
            match line.trim().parse::<u32>() {
                Ok(choice) => return Ok(Some(choice)),
                Err(_) => self.say("Your input is invalid!")?,
            }
        }
    }
}
