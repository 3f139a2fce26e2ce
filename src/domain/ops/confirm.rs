// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::shared::error::OpsError;
use std::io::{BufRead, Write};

pub trait ConfirmationGate {
    /// Returns `true` when the user agrees to go ahead with `names`.
    fn confirm(&mut self, names: &[String]) -> Result<bool, OpsError>;
}

/// Asks the user to type the target names back.
pub struct PromptConfirmation<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirmation<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl PromptConfirmation<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdin() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ConfirmationGate for PromptConfirmation<R, W> {
    fn confirm(&mut self, names: &[String]) -> Result<bool, OpsError> {
        write!(
            self.output,
            "Please type the name again(separate with white space when more than one): "
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        let typed: Vec<&str> = line.split_whitespace().collect();
        let confirmed =
            typed.len() == names.len() && names.iter().all(|name| typed.contains(&name.as_str()));
        if !confirmed {
            writeln!(
                self.output,
                "typed \"{}\" does not match \"{}\"",
                typed.join(" "),
                names.join(" ")
            )?;
        }
        Ok(confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> PromptConfirmation<Cursor<Vec<u8>>, Vec<u8>> {
        PromptConfirmation::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_confirm_matching_name() {
        let mut gate = prompt("mycluster\n");
        assert!(gate.confirm(&names(&["mycluster"])).unwrap());
        let output = String::from_utf8(gate.into_output()).unwrap();
        assert!(output.contains("Please type the name again"));
    }

    #[test]
    fn test_confirm_multiple_names_any_order() {
        let mut gate = prompt("  b a \n");
        assert!(gate.confirm(&names(&["a", "b"])).unwrap());
    }

    #[test]
    fn test_confirm_mismatch() {
        let mut gate = prompt("other\n");
        assert!(!gate.confirm(&names(&["mycluster"])).unwrap());
        let output = String::from_utf8(gate.into_output()).unwrap();
        assert!(output.contains("does not match"));
    }

    #[test]
    fn test_confirm_eof() {
        let mut gate = prompt("");
        assert!(!gate.confirm(&names(&["mycluster"])).unwrap());
    }
}
