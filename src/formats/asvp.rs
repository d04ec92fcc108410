// ssprs-profile/src/formats/asvp.rs

//! Kongsberg ASVP sound velocity files.
//!
//! ```text
//! ( SoundVelocity  1.0 0 201503101230 43.12345678 -70.12345678 -1 0 0 SSM_ASVP P 3 )
//! 0.00 1500.00
//! 10.00 1499.20
//! 50.00 1490.10
//! ```

use super::callbacks::Callbacks;
use super::errors::FormatError;
use super::helpers::{finalize_profiles, read_text_lines};
use super::{FormatReader, FormatWriter};
use crate::oceanography::d2p_array;
use crate::profile::{Profile, ProfileList, SampleRow, Samples, SensorType};
use crate::settings::ProcessingSettings;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const HEADER_TAG: &str = "SoundVelocity";
const TIME_FORMAT: &str = "%Y%m%d%H%M";

#[derive(Clone, Copy, Debug, Default)]
pub struct AsvpReader;

#[derive(Clone, Copy, Debug, Default)]
pub struct AsvpWriter;

struct Header {
    time: Option<DateTime<Utc>>,
    position: Option<(f64, f64)>,
}

fn parse_header(line: &str, path: &Path) -> Result<Header, FormatError> {
    let fields: Vec<&str> = line
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split_whitespace()
        .collect();
    if fields.len() < 6 || fields[0] != HEADER_TAG {
        return Err(FormatError::MissingHeader(path.to_path_buf()));
    }
    let time = NaiveDateTime::parse_from_str(fields[3], TIME_FORMAT)
        .ok()
        .map(|t| t.and_utc());
    let position = match (fields[4].parse::<f64>(), fields[5].parse::<f64>()) {
        (Ok(lat), Ok(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
        _ => None,
    };
    Ok(Header { time, position })
}

fn parse_sample(line: &str, path: &Path, line_no: usize) -> Result<(f64, f64), FormatError> {
    let parse_error = |msg: &str| FormatError::ParseError(path.to_path_buf(), line_no, msg.to_string());
    let mut fields = line.split_whitespace();
    let mut next_value = |name: &str| -> Result<f64, FormatError> {
        fields
            .next()
            .ok_or_else(|| parse_error(&format!("missing {}", name)))?
            .parse::<f64>()
            .map_err(|e| parse_error(&format!("invalid {}: {}", name, e)))
    };
    let depth = next_value("depth")?;
    let speed = next_value("speed")?;
    Ok((depth, speed))
}

impl FormatReader for AsvpReader {
    fn read(
        &self,
        path: &Path,
        settings: &ProcessingSettings,
        callbacks: &mut dyn Callbacks,
    ) -> Result<ProfileList, FormatError> {
        let lines = read_text_lines(path)?;
        let mut lines = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());
        let (_, header_line) = lines
            .next()
            .ok_or_else(|| FormatError::MissingHeader(path.to_path_buf()))?;
        let header = parse_header(header_line, path)?;

        let mut depth = Vec::new();
        let mut speed = Vec::new();
        for (idx, line) in lines {
            let (d, v) = parse_sample(line, path, idx + 1)?;
            depth.push(d);
            speed.push(v);
        }
        debug!("{}: {} samples", path.display(), depth.len());

        let mut profile = Profile::new();
        profile.meta.sensor_type = SensorType::Svp;
        profile.meta.utc_time = header.time;
        if let Some((lat, lon)) = header.position {
            profile.meta.set_position(lat, lon)?;
        }
        let mut data = Samples::from_depth_speed(&depth, &speed);
        let lat = profile.meta.latitude().unwrap_or(settings.default_latitude);
        let pressure = d2p_array(&data.depth(), lat);
        data.pressure_mut().assign(&pressure);
        profile.data = data;

        let mut profiles = ProfileList::from(vec![profile]);
        finalize_profiles(&mut profiles, path, settings, callbacks)?;
        info!("Read ASVP cast from {}", path.display());
        Ok(profiles)
    }
}

impl AsvpWriter {
    fn header(profile: &Profile, num_samples: usize) -> String {
        let time = profile
            .meta
            .utc_time
            .or(profile.meta.proc_time())
            .unwrap_or_else(Utc::now);
        format!(
            "( {}  1.0 0 {} {:.8} {:.8} -1 0 0 SSM_ASVP P {} )",
            HEADER_TAG,
            time.format(TIME_FORMAT),
            profile.meta.latitude().unwrap_or(0.0),
            profile.meta.longitude().unwrap_or(0.0),
            num_samples
        )
    }

    fn rows(samples: &Samples) -> impl Iterator<Item = SampleRow> + '_ {
        (0..samples.num_samples()).filter_map(|i| samples.row(i))
    }
}

impl FormatWriter for AsvpWriter {
    fn write(&self, profile: &Profile, path: &Path) -> Result<(), FormatError> {
        let samples = profile.export_samples()?;
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", Self::header(profile, samples.num_samples()))?;
        for row in Self::rows(&samples) {
            writeln!(writer, "{:.2} {:.2}", row.depth, row.speed)?;
        }
        writer.flush()?;
        info!(
            "Wrote {} samples to {}",
            samples.num_samples(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::callbacks::NoCallbacks;
    use crate::profile::{Direction, Flag};
    use chrono::TimeZone;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("ssprs_{}_{}.asvp", name, std::process::id()))
    }

    #[test]
    fn test_read_asvp() {
        let path = temp_path("read");
        fs::write(
            &path,
            "( SoundVelocity  1.0 0 201503101230 43.12345678 -70.12345678 -1 0 0 SSM_ASVP P 3 )\n\
             0.00 1500.00\n\
             10.00 1499.20\n\
             \n\
             50.00 1490.10\n",
        )
        .unwrap();
        let profiles = AsvpReader
            .read(&path, &ProcessingSettings::default(), &mut NoCallbacks)
            .unwrap();
        fs::remove_file(&path).unwrap();

        let profile = profiles.current().unwrap();
        assert_eq!(profile.data.depth().to_vec(), vec![0.0, 10.0, 50.0]);
        assert_eq!(profile.data.speed()[2], 1490.1);
        assert!(profile.data.pressure()[2] > 50.0);
        assert_eq!(profile.meta.latitude(), Some(43.12345678));
        assert_eq!(
            profile.meta.utc_time,
            Some(Utc.with_ymd_and_hms(2015, 3, 10, 12, 30, 0).unwrap())
        );
        assert_eq!(profile.meta.original_path, path);
    }

    #[test]
    fn test_read_reports_bad_line() {
        let path = temp_path("bad");
        fs::write(
            &path,
            "( SoundVelocity  1.0 0 201503101230 43.0 -70.0 -1 0 0 SSM_ASVP P 2 )\n0.0 1500.0\n5.0 abc\n",
        )
        .unwrap();
        let result = AsvpReader.read(&path, &ProcessingSettings::default(), &mut NoCallbacks);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(FormatError::ParseError(_, 3, _))));

        let path = temp_path("noheader");
        fs::write(&path, "0.0 1500.0\n").unwrap();
        let result = AsvpReader.read(&path, &ProcessingSettings::default(), &mut NoCallbacks);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(FormatError::MissingHeader(_))));
    }

    #[test]
    fn test_write_thinned_sis() {
        let mut profile = Profile::new();
        profile.meta.set_position(43.5, -70.25).unwrap();
        profile.meta.utc_time = Some(Utc.with_ymd_and_hms(2021, 7, 4, 8, 5, 0).unwrap());
        profile.data = Samples::from_depth_speed(
            &[0.0, 10.0, 20.0, 30.0, 20.0],
            &[1500.0, 1500.0, 1500.0, 1490.0, 1491.0],
        );
        profile.reduce_up_down(Direction::Down).unwrap();
        profile.clone_data_to_proc().unwrap();
        profile.clone_proc_to_sis();
        profile.thin(0.1).unwrap();
        assert_eq!(profile.sis.flag()[1], Flag::Valid);

        let path = temp_path("write");
        AsvpWriter.write(&profile, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "( SoundVelocity  1.0 0 202107040805 43.50000000 -70.25000000 -1 0 0 SSM_ASVP P 3 )"
        );
        assert_eq!(&lines[1..], &["0.00 1500.00", "20.00 1500.00", "30.00 1490.00"]);
    }
}
