use crate::Kinetics::parse_reactions::parse_reaction_equation;
use crate::Kinetics::reaction_system::ElementaryReaction;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// One record of the REACTIONS section. A record is either a chemistry
/// shorthand equation with a rate-constant name, or the explicit name-keyed
/// mappings of an [`ElementaryReaction`].
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum ReactionEntry {
    Equation { eq: String, rate_constant: String },
    Explicit(ElementaryReaction),
}

impl ReactionEntry {
    pub fn into_reaction(self) -> Result<ElementaryReaction, String> {
        match self {
            ReactionEntry::Equation { eq, rate_constant } => {
                parse_reaction_equation(&eq, &rate_constant).map_err(|e| e.to_string())
            }
            ReactionEntry::Explicit(reaction) => Ok(reaction),
        }
    }
}

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_reactions(&self) -> Result<Vec<ElementaryReaction>, String> {
        load_and_validate_reactions(&self.file_name)
    }
    pub fn load_substance_list(&self) -> Result<Vec<String>, String> {
        load_substance_list(&self.file_name)
    }
}

fn read_lines(file_name: &str) -> Result<Vec<String>, String> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(format!("File '{}' does not exist", file_name));
    }
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Err(format!("Failed to open file '{}': {}", file_name, e)),
    };
    let reader = BufReader::new(file);
    Ok(reader.lines().filter_map(Result::ok).collect())
}

/// Find the section following one of the given headers; the section ends at
/// the next all-caps header line or at the end of the document.
fn section_bounds(lines: &[String], headers: &[&str]) -> Option<(usize, usize)> {
    let mut start_index = None;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim().to_uppercase();
        if headers.iter().any(|h| trimmed == *h) {
            start_index = Some(i + 1);
            break;
        }
    }
    let start_index = start_index?;
    let mut end_index = lines.len();
    for i in start_index..lines.len() {
        let trimmed = lines[i].trim();
        if !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_uppercase() || c == '_' || c == ' ')
            && trimmed.chars().any(|c| c.is_uppercase())
        {
            end_index = i;
            break;
        }
    }
    Some((start_index, end_index))
}

/// Parses a document for the reaction set under the "REACTIONS" or "KINETICS"
/// header. The payload is a JSON array of [`ReactionEntry`] records.
pub fn load_reactions_from_file(file_name: &str) -> Result<Vec<ElementaryReaction>, String> {
    let lines = read_lines(file_name)?;

    let (start_index, end_index) = section_bounds(&lines, &["REACTIONS", "KINETICS"])
        .ok_or_else(|| {
            format!(
                "No 'REACTIONS' or 'KINETICS' header found in file '{}'",
                file_name
            )
        })?;

    let reactions_section = lines[start_index..end_index].join("\n");

    let result: Result<Vec<ReactionEntry>, serde_json::Error> =
        serde_json::from_str(&reactions_section);

    match result {
        Ok(entries) => {
            let mut reactions = Vec::with_capacity(entries.len());
            for entry in entries {
                reactions.push(entry.into_reaction()?);
            }
            info!(
                "Successfully parsed {} reactions from file '{}'",
                reactions.len(),
                file_name
            );
            Ok(reactions)
        }
        Err(e) => {
            let error_line = e.line();
            let error_column = e.column();
            // line number in the file, not in the extracted section
            let actual_line = start_index + error_line - 1;

            let error_msg = format!(
                "Error parsing reaction data at line {}, column {} (line {} in file): {}",
                error_line, error_column, actual_line, e
            );
            error!("{}", error_msg);

            if actual_line < lines.len() {
                let problem_line = &lines[actual_line];
                error!("Problematic line: {}", problem_line);
                if error_column <= problem_line.len() {
                    let pointer = " ".repeat(error_column - 1) + "^";
                    error!("{}", pointer);
                }
            }

            Err(error_msg)
        }
    }
}

/// Loads the reaction set and validates it.
pub fn load_and_validate_reactions(file_name: &str) -> Result<Vec<ElementaryReaction>, String> {
    let reactions = load_reactions_from_file(file_name)?;

    if reactions.is_empty() {
        warn!("Loaded reaction set is empty");
    }
    for (j, reaction) in reactions.iter().enumerate() {
        if reaction.rate_constant.trim().is_empty() {
            return Err(format!("Reaction {} has an empty rate-constant name", j));
        }
        if reaction.net_stoich.is_empty() {
            warn!("Reaction {} changes nothing (empty net stoichiometry)", j);
        }
    }

    info!(
        "Loaded and validated {} reactions from file '{}'",
        reactions.len(),
        file_name
    );
    Ok(reactions)
}

/// load from file list of substances
pub fn load_substance_list(file_name: &str) -> Result<Vec<String>, String> {
    let lines = read_lines(file_name)?;

    let (start_index, end_index) =
        section_bounds(&lines, &["SUBSTANCES", "SUBSTANCES LIST", "SPECIES"]).ok_or_else(
            || format!("No 'SUBSTANCES' header found in file '{}'", file_name),
        )?;

    let list_of_subs = lines[start_index..end_index].join("\n");
    let vec_of_molecules: Vec<String> = list_of_subs
        .replace('\n', ", ")
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if vec_of_molecules.is_empty() {
        return Err(format!("No substances found in file '{}'", file_name));
    }
    Ok(vec_of_molecules)
}

/// Write a kinetic task document: substances section plus reaction section.
/// The produced file round-trips through [`load_reactions_from_file`] and
/// [`load_substance_list`].
pub fn save_reaction_task(
    file_name: &str,
    substances: &[String],
    reactions: &[ElementaryReaction],
) -> Result<(), String> {
    let entries: Vec<ReactionEntry> = reactions
        .iter()
        .cloned()
        .map(ReactionEntry::Explicit)
        .collect();
    let payload = serde_json::to_string_pretty(&entries)
        .map_err(|e| format!("Failed to serialize reactions: {}", e))?;

    let mut file =
        File::create(file_name).map_err(|e| format!("Failed to create '{}': {}", file_name, e))?;
    writeln!(file, "SUBSTANCES").map_err(|e| e.to_string())?;
    writeln!(file, "{}", substances.join(", ")).map_err(|e| e.to_string())?;
    writeln!(file, "REACTIONS").map_err(|e| e.to_string())?;
    writeln!(file, "{}", payload).map_err(|e| e.to_string())?;
    info!(
        "Kinetic task with {} reactions written to '{}'",
        reactions.len(),
        file_name
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_reactions_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Some header text").unwrap();
        writeln!(temp_file, "SUBSTANCES").unwrap();
        writeln!(temp_file, "A, B, C").unwrap();
        writeln!(temp_file, "REACTIONS").unwrap();
        writeln!(temp_file, "[").unwrap();
        writeln!(
            temp_file,
            "  {{ \"eq\": \"A => B\", \"rate_constant\": \"k1\" }},"
        )
        .unwrap();
        writeln!(
            temp_file,
            "  {{ \"rate_constant\": \"k2\", \"reactants\": {{\"B\": 1.0}}, \"net_stoich\": {{\"B\": -1.0, \"C\": 1.0}} }}"
        )
        .unwrap();
        writeln!(temp_file, "]").unwrap();
        writeln!(temp_file, "ANOTHER_HEADER").unwrap();
        writeln!(temp_file, "Some other content").unwrap();

        let file_path = temp_file.path().to_str().unwrap();

        let substances = load_substance_list(file_path).unwrap();
        assert_eq!(substances, vec!["A", "B", "C"]);

        let reactions = load_reactions_from_file(file_path).unwrap();
        assert_eq!(reactions.len(), 2);
        assert_eq!(reactions[0].rate_constant, "k1");
        assert_eq!(
            reactions[0].net_stoich,
            HashMap::from([("A".to_string(), -1.0), ("B".to_string(), 1.0)])
        );
        assert_eq!(reactions[1].rate_constant, "k2");
        assert_eq!(
            reactions[1].reactants,
            HashMap::from([("B".to_string(), 1.0)])
        );
    }

    #[test]
    fn test_load_reactions_no_header() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Some content without a REACTIONS header").unwrap();

        let file_path = temp_file.path().to_str().unwrap();
        let result = load_reactions_from_file(file_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .contains("No 'REACTIONS' or 'KINETICS' header found")
        );
    }

    #[test]
    fn test_load_reactions_invalid_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "REACTIONS").unwrap();
        writeln!(temp_file, "[").unwrap();
        writeln!(temp_file, "  {{ \"eq\": \"A => B\" ").unwrap();
        writeln!(temp_file, "]").unwrap();

        let file_path = temp_file.path().to_str().unwrap();
        let result = load_reactions_from_file(file_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Error parsing reaction data"));
    }

    #[test]
    fn test_substance_list_with_spaces_and_lines() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "SPECIES").unwrap();
        writeln!(temp_file, "H2O , CO2,   CH4").unwrap();
        writeln!(temp_file, "O2, N2").unwrap();
        writeln!(temp_file, "ANOTHER_HEADER").unwrap();

        let file_path = temp_file.path().to_str().unwrap();
        let substances = load_substance_list(file_path).unwrap();
        assert_eq!(substances, vec!["H2O", "CO2", "CH4", "O2", "N2"]);
    }

    #[test]
    fn test_substance_list_empty_section() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "SUBSTANCES").unwrap();
        writeln!(temp_file, "").unwrap();
        writeln!(temp_file, "ANOTHER_HEADER").unwrap();

        let file_path = temp_file.path().to_str().unwrap();
        assert!(load_substance_list(file_path).is_err());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let reactions = vec![
            ElementaryReaction::new(
                "l1",
                HashMap::from([("x".to_string(), 1.0)]),
                HashMap::from([("x".to_string(), -1.0), ("y".to_string(), 1.0)]),
            ),
            ElementaryReaction::new(
                "l2",
                HashMap::from([("y".to_string(), 1.0)]),
                HashMap::from([("y".to_string(), -1.0), ("z".to_string(), 1.0)]),
            ),
        ];
        let substances = vec!["x".to_string(), "y".to_string(), "z".to_string()];

        let temp_file = NamedTempFile::new().unwrap();
        let file_path = temp_file.path().to_str().unwrap();
        save_reaction_task(file_path, &substances, &reactions).unwrap();

        let ld = LoadData::new(file_path.to_owned());
        let loaded_substances = ld.load_substance_list().unwrap();
        let loaded_reactions = ld.load_reactions().unwrap();
        assert_eq!(loaded_substances, substances);
        assert_eq!(loaded_reactions, reactions);
    }
}
