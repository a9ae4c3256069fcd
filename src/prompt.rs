//! Numbered menus for picking the language and the city.
//!
//! Input and output are generic so the menus can be driven from tests.

use crate::models::{City, Language};
use anyhow::{bail, Context, Result};
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{BufRead, Write};

pub fn select_language<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Language> {
    queue!(
        output,
        SetForegroundColor(Color::White),
        Print("Languages:\n"),
        ResetColor
    )?;
    for (i, language) in Language::ALL.iter().enumerate() {
        queue!(
            output,
            SetForegroundColor(Color::DarkGrey),
            Print(format!("{}- ", i + 1)),
            ResetColor,
            Print(format!("{}\n", language.label()))
        )?;
    }

    let index = read_choice(input, output, "> ", Language::ALL.len(), |_| {
        "Please enter 1 or 2.".to_string()
    })?;
    Ok(Language::ALL[index])
}

pub fn select_city<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    language: Language,
) -> Result<City> {
    queue!(
        output,
        SetForegroundColor(Color::DarkGrey),
        Print(format!("{}\n", "-".repeat(49))),
        ResetColor
    )?;
    for (i, city) in City::ALL.iter().enumerate() {
        queue!(
            output,
            SetForegroundColor(Color::DarkGrey),
            Print(format!("{}- ", i + 1)),
            ResetColor,
            Print(format!("{}\n", city))
        )?;
    }

    let prompt = match language {
        Language::French => "Choisissez la ville: ",
        Language::English => "Choose the city: ",
    };
    let index = read_choice(input, output, prompt, City::ALL.len(), |count| {
        format!("Please enter a number between 1 and {}.", count)
    })?;
    Ok(City::ALL[index])
}

/// Asks until a number in `1..=count` is entered; returns it zero-based.
fn read_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    count: usize,
    out_of_range: impl Fn(usize) -> String,
) -> Result<usize> {
    loop {
        queue!(output, Print(prompt))?;
        output.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("Failed to read choice")?;
        if read == 0 {
            bail!("Input closed before a choice was made");
        }

        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=count).contains(&choice) => return Ok(choice - 1),
            Ok(_) => warn_line(output, &out_of_range(count))?,
            Err(_) => warn_line(output, "Invalid input. Enter a number.")?,
        }
    }
}

fn warn_line<W: Write>(output: &mut W, message: &str) -> Result<()> {
    queue!(
        output,
        SetForegroundColor(Color::Yellow),
        Print(format!("{}\n", message)),
        ResetColor
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn output_text(output: Vec<u8>) -> String {
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn picks_language_by_number() {
        let mut input = Cursor::new("2\n");
        let mut output = Vec::new();
        let language = select_language(&mut input, &mut output).unwrap();

        assert_eq!(language, Language::English);
        assert!(output_text(output).contains("1- "));
    }

    #[test]
    fn retries_after_invalid_language_input() {
        let mut input = Cursor::new("abc\n7\n1\n");
        let mut output = Vec::new();
        let language = select_language(&mut input, &mut output).unwrap();

        assert_eq!(language, Language::French);
        let text = output_text(output);
        assert!(text.contains("Invalid input. Enter a number."));
        assert!(text.contains("Please enter 1 or 2."));
    }

    #[test]
    fn city_prompt_is_localized() {
        let mut output = Vec::new();
        let city = select_city(&mut Cursor::new("4\n"), &mut output, Language::French).unwrap();
        assert_eq!(city, City::Casablanca);
        assert!(output_text(output).contains("Choisissez la ville: "));

        let mut output = Vec::new();
        let city = select_city(&mut Cursor::new(" 5 \n"), &mut output, Language::English).unwrap();
        assert_eq!(city, City::Agadir);
        assert!(output_text(output).contains("Choose the city: "));
    }

    #[test]
    fn out_of_range_city_is_reported() {
        let mut output = Vec::new();
        let city = select_city(&mut Cursor::new("0\n6\n1\n"), &mut output, Language::English).unwrap();

        assert_eq!(city, City::Rabat);
        assert!(output_text(output).contains("Please enter a number between 1 and 5."));
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut output = Vec::new();
        assert!(select_language(&mut Cursor::new(""), &mut output).is_err());
    }
}
