//! Interactive menu driving the same commands as the command line.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use image_cipher::{KeySize, KeyStore, Mode};
use tracing::warn;

use crate::app::App;
use crate::cli::Command;
use crate::raster;

const MENU: &str = "
Menu:
1. Generate ECB key
2. Generate CBC key
3. Save in grayscale
4. Encrypt with ECB
5. Encrypt with CBC
6. Decrypt ECB encrypted image
7. Decrypt CBC encrypted image
8. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    GenerateKey(Mode),
    Grayscale,
    Encrypt(Mode),
    Decrypt(Mode),
    Exit,
}

impl Choice {
    fn from_number(n: u32) -> Option<Self> {
        Some(match n {
            1 => Choice::GenerateKey(Mode::Ecb),
            2 => Choice::GenerateKey(Mode::Cbc),
            3 => Choice::Grayscale,
            4 => Choice::Encrypt(Mode::Ecb),
            5 => Choice::Encrypt(Mode::Cbc),
            6 => Choice::Decrypt(Mode::Ecb),
            7 => Choice::Decrypt(Mode::Cbc),
            8 => Choice::Exit,
            _ => return None,
        })
    }
}

/// Outcome of collecting the arguments for one menu choice.
enum Step {
    Run(Command),
    Skip,
    Quit,
}

pub struct Menu<'a, S, R, W> {
    app: &'a mut App<S>,
    input: R,
    output: W,
}

impl<'a, S: KeyStore, R: BufRead, W: Write> Menu<'a, S, R, W> {
    pub fn new(app: &'a mut App<S>, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    /// Loop until the user picks Exit or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;

            let Some(number) = self.prompt_number("Enter your choice: ")? else {
                return self.exit();
            };
            let Some(choice) = Choice::from_number(number) else {
                writeln!(self.output, "Invalid choice!")?;
                continue;
            };

            let command = match self.collect(choice)? {
                Step::Run(command) => command,
                Step::Skip => continue,
                Step::Quit => return self.exit(),
            };

            match self.app.execute(&command) {
                Ok(message) => writeln!(self.output, "{message}")?,
                Err(e) => {
                    warn!(?command, error = %e, "command failed");
                    writeln!(self.output, "Error: {e:#}")?;
                }
            }
        }
    }

    fn collect(&mut self, choice: Choice) -> Result<Step> {
        let mode = match choice {
            Choice::Exit => return Ok(Step::Quit),
            Choice::GenerateKey(mode) => {
                return Ok(match self.prompt_key_size()? {
                    Some(bits) => Step::Run(Command::Keygen { mode, bits }),
                    None => Step::Quit,
                });
            }
            Choice::Grayscale => None,
            Choice::Encrypt(mode) | Choice::Decrypt(mode) => Some(mode),
        };

        let Some(path) = self.prompt_line("Enter the image path: ")? else {
            return Ok(Step::Quit);
        };
        let input = PathBuf::from(path);
        if !input.exists() {
            writeln!(self.output, "File not found!")?;
            return Ok(Step::Skip);
        }
        if let Err(e) = raster::load_grayscale(&input) {
            warn!(input = %input.display(), error = %e, "unreadable image");
            writeln!(self.output, "Error loading the image!")?;
            return Ok(Step::Skip);
        }

        let Some(mode) = mode else {
            return Ok(Step::Run(Command::Grayscale { input }));
        };
        let Some(bits) = self.select_key(mode)? else {
            return Ok(Step::Skip);
        };

        Ok(Step::Run(match choice {
            Choice::Encrypt(_) => Command::Encrypt { mode, bits, input },
            _ => Command::Decrypt {
                mode,
                bits,
                input,
                crop: None,
            },
        }))
    }

    /// List stored keys for `mode` and let the user pick one by number.
    ///
    /// Returns `None` when there is nothing to pick or input ends.
    fn select_key(&mut self, mode: Mode) -> Result<Option<KeySize>> {
        let keys = self.app.store().list(mode)?;
        if keys.is_empty() {
            writeln!(self.output, "No {mode}_key keys found!")?;
            return Ok(None);
        }

        writeln!(self.output, "Available {mode}_key keys:")?;
        for (i, id) in keys.iter().enumerate() {
            writeln!(self.output, "{}. {id}", i + 1)?;
        }

        loop {
            let Some(n) = self.prompt_number("Select a key: ")? else {
                return Ok(None);
            };
            match keys.get((n as usize).wrapping_sub(1)) {
                Some(id) => return Ok(Some(id.size)),
                None => writeln!(self.output, "Invalid selection!")?,
            }
        }
    }

    fn exit(&mut self) -> Result<()> {
        writeln!(self.output, "Exiting the program...")?;
        Ok(())
    }

    fn prompt_key_size(&mut self) -> Result<Option<KeySize>> {
        loop {
            let Some(bits) = self.prompt_number("Select key size (128, 192, 256 bits): ")? else {
                return Ok(None);
            };
            match KeySize::from_bits(bits) {
                Ok(size) => return Ok(Some(size)),
                Err(_) => writeln!(
                    self.output,
                    "Invalid key size! Please select 128, 192, or 256 bits."
                )?,
            }
        }
    }

    fn prompt_number(&mut self, prompt: &str) -> Result<Option<u32>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => writeln!(self.output, "Please enter a valid number!")?,
            }
        }
    }

    /// `None` once input is exhausted.
    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_cipher::{ByteGrid, FsKeyStore, KeyId, MemoryKeyStore};
    use std::io::Cursor;

    fn run_script<S: KeyStore>(app: &mut App<S>, script: &str) -> String {
        let mut output = Vec::new();
        Menu::new(app, Cursor::new(script.as_bytes()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_generate_encrypt_decrypt_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(FsKeyStore::new(dir.path()), dir.path());

        let image = ByteGrid::new(10, 10, vec![200; 100]).unwrap();
        let input = dir.path().join("img.png");
        raster::save_grayscale(&input, &image).unwrap();
        let encrypted = dir.path().join("img_cbc_128_encrypted.png");

        let script = format!(
            "2\n128\n5\n{}\n1\n7\n{}\n1\n8\n",
            input.display(),
            encrypted.display()
        );
        let output = run_script(&mut app, &script);

        assert!(output.contains("CBC key saved as cbc_key_128.bin and IV saved as cbc_iv_128.bin!"));
        assert!(output.contains("Available cbc_key keys:\n1. cbc_key_128.bin"));
        assert!(output.contains("Image encrypted with CBC and saved as img_cbc_128_encrypted.png!"));
        assert!(output.contains(
            "Image decrypted with CBC and saved as img_cbc_128_encrypted_cbc_128_decrypted.png!"
        ));
        assert!(output.ends_with("Exiting the program...\n"));

        let decrypted = raster::load_grayscale(
            &dir.path().join("img_cbc_128_encrypted_cbc_128_decrypted.png"),
        )
        .unwrap();
        assert_eq!(decrypted.shape(), (16, 16));
        assert_eq!(decrypted.crop(10, 10).unwrap(), image);
    }

    #[test]
    fn test_invalid_inputs_reprompt() {
        let mut app = App::new(MemoryKeyStore::new(), ".");
        let output = run_script(&mut app, "abc\n9\n1\n100\nxyz\n192\n8\n");

        assert!(output.contains("Please enter a valid number!"));
        assert!(output.contains("Invalid choice!"));
        assert!(output.contains("Invalid key size! Please select 128, 192, or 256 bits."));
        assert!(output.contains("ECB key saved as ecb_key_192.bin!"));
        assert!(app
            .store()
            .get(&KeyId::key(Mode::Ecb, KeySize::Aes192))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_missing_file_and_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(MemoryKeyStore::new(), dir.path());
        let input = dir.path().join("img.png");
        raster::save_grayscale(&input, &ByteGrid::zeros(4, 4)).unwrap();

        let script = format!(
            "4\n{}\n6\n{}\n8\n",
            dir.path().join("absent.png").display(),
            input.display()
        );
        let output = run_script(&mut app, &script);

        assert!(output.contains("File not found!"));
        assert!(output.contains("No ecb_key keys found!"));
    }

    #[test]
    fn test_unreadable_image_is_reported_before_key_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(MemoryKeyStore::new(), dir.path());
        let input = dir.path().join("broken.png");
        std::fs::write(&input, b"not an image").unwrap();

        let script = format!("6\n{}\n8\n", input.display());
        let output = run_script(&mut app, &script);

        assert!(output.contains("Error loading the image!"));
        assert!(!output.contains("No ecb_key keys found!"));
        assert!(!output.contains("Select a key: "));
    }

    #[test]
    fn test_invalid_key_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(MemoryKeyStore::new(), dir.path());
        let input = dir.path().join("img.png");
        raster::save_grayscale(&input, &ByteGrid::zeros(4, 4)).unwrap();

        let script = format!("1\n256\n4\n{}\n0\n2\n1\n8\n", input.display());
        let output = run_script(&mut app, &script);

        assert_eq!(output.matches("Invalid selection!").count(), 2);
        assert!(output.contains("Image encrypted with ECB and saved as img_ecb_256_encrypted.png!"));
    }

    #[test]
    fn test_errors_keep_the_loop_alive() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(MemoryKeyStore::new(), dir.path());
        let input = dir.path().join("img.png");
        raster::save_grayscale(&input, &ByteGrid::zeros(3, 3)).unwrap();

        // a 3x3 image is not block aligned, so decrypting it fails
        let script = format!("1\n128\n6\n{}\n1\n3\n{}\n8\n", input.display(), input.display());
        let output = run_script(&mut app, &script);

        assert!(output.contains("Error: Buffer of 9 bytes is not aligned"));
        assert!(output.contains("Saved in grayscale img.png!"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let mut app = App::new(MemoryKeyStore::new(), ".");
        let output = run_script(&mut app, "1\n");
        assert!(output.ends_with("Select key size (128, 192, 256 bits): Exiting the program...\n"));
        assert!(app.store().list(Mode::Ecb).unwrap().is_empty());

        let output = run_script(&mut app, "");
        assert!(output.ends_with("Enter your choice: Exiting the program...\n"));
    }
}
