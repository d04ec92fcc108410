// ssprs-profile/src/formats/csv_writer.rs

use super::errors::FormatError;
use super::FormatWriter;
use crate::profile::{Flag, Profile, Source};
use log::info;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct CsvRow {
    depth: f64,
    speed: f64,
    temp: f64,
    sal: f64,
    pressure: f64,
    conductivity: f64,
    source: Source,
}

/// Valid `proc` samples as comma separated values with a header row.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsvWriter;

impl FormatWriter for CsvWriter {
    fn write(&self, profile: &Profile, path: &Path) -> Result<(), FormatError> {
        let mut writer = csv::Writer::from_path(path)?;
        let valid = profile.proc.indices_with_flag(Flag::Valid);
        for row in valid.iter().filter_map(|&i| profile.proc.row(i)) {
            writer.serialize(CsvRow {
                depth: row.depth,
                speed: row.speed,
                temp: row.temp,
                sal: row.sal,
                pressure: row.pressure,
                conductivity: row.conductivity,
                source: row.source,
            })?;
        }
        writer.flush()?;
        info!("Wrote {} rows to {}", valid.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Samples;
    use std::fs;

    #[test]
    fn test_csv_skips_invalid_samples() {
        let mut profile = Profile::new();
        profile.proc = Samples::from_depth_speed(&[0.0, 5.0, 10.0], &[1500.0, 1499.5, 1499.0]);
        profile.proc.flag_mut()[1] = Flag::User;
        profile.proc.source_mut()[2] = Source::User;

        let path = std::env::temp_dir().join(format!("ssprs_{}.csv", std::process::id()));
        CsvWriter.write(&profile, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "depth,speed,temp,sal,pressure,conductivity,source");
        assert_eq!(lines[1], "0.0,1500.0,0.0,0.0,0.0,0.0,raw");
        assert_eq!(lines[2], "10.0,1499.0,0.0,0.0,0.0,0.0,user");
        assert_eq!(lines.len(), 3);
    }
}
