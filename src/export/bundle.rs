use std::io::Write;

use zip::write::{FileOptions, ZipWriter};

use crate::utils::error::Result;

/// Packs named text artifacts into a single ZIP archive, in the order given.
pub fn bundle_artifacts(artifacts: &[(String, String)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, content) in artifacts {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_reopens_with_every_artifact_intact() {
        let artifacts = vec![
            ("data.json".to_string(), "[]".to_string()),
            ("data.csv".to_string(), "source_file\n".to_string()),
        ];

        let bytes = bundle_artifacts(&artifacts).unwrap();
        let cursor = std::io::Cursor::new(bytes);
        let mut archive = zip::ZipArchive::new(cursor).unwrap();

        assert_eq!(archive.len(), 2);
        let file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(file_names, vec!["data.json", "data.csv"]);

        let mut csv_file = archive.by_name("data.csv").unwrap();
        let mut csv_content = String::new();
        std::io::Read::read_to_string(&mut csv_file, &mut csv_content).unwrap();
        assert_eq!(csv_content, "source_file\n");
    }

    #[test]
    fn empty_artifact_list_still_yields_a_valid_archive() {
        let bytes = bundle_artifacts(&[]).unwrap();
        let cursor = std::io::Cursor::new(bytes);
        let archive = zip::ZipArchive::new(cursor).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
