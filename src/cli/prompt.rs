//! Interactive captcha solving for the command line

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::session::{Captcha, CaptchaSolver};
use crate::{Error, Result};

/// Saves the captcha image to a file and reads the solution from stdin
#[derive(Debug, Clone)]
pub struct PromptSolver {
    dir: PathBuf,
}

impl PromptSolver {
    /// Save captcha images under `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where the image of `captcha` is written
    pub fn image_path(&self, captcha: &Captcha) -> PathBuf {
        self.dir.join(format!("rap2-captcha.{}", captcha.extension()))
    }

    fn read_solution(&self, captcha: &Captcha, input: &mut impl BufRead) -> Result<String> {
        let path = self.image_path(captcha);
        std::fs::write(&path, &captcha.image)?;

        let mut stderr = std::io::stderr();
        write!(stderr, "Captcha saved to {}\nEnter captcha: ", path.display())?;
        stderr.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        let solution = line.trim().to_string();
        if solution.is_empty() {
            return Err(Error::validation("/account/login", "captcha can't be empty"));
        }
        Ok(solution)
    }
}

impl Default for PromptSolver {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl CaptchaSolver for PromptSolver {
    fn solve(&self, captcha: &Captcha) -> Result<String> {
        self.read_solution(captcha, &mut std::io::stdin().lock())
    }
}
