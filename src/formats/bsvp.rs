// ssprs-profile/src/formats/bsvp.rs

//! Append-only binary cast archive.
//!
//! Every cast is a little-endian header followed by `count` fixed-size
//! records. Casts are concatenated, so a file is read until end of stream.

use super::callbacks::Callbacks;
use super::errors::FormatError;
use super::helpers::{finalize_profiles, read_binary};
use super::{FormatReader, FormatWriter};
use crate::profile::{Flag, Profile, ProfileError, ProfileList, SampleRow, Samples, Source};
use crate::settings::ProcessingSettings;
use binrw::io::{Cursor, Read, Seek, SeekFrom};
use binrw::{binrw, BinRead, BinResult, BinWrite};
use log::{debug, info, trace, warn};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

#[binrw]
#[brw(little)]
#[derive(Clone, Debug, PartialEq)]
pub struct CastRecord {
    pub idx: i32,
    pub depth: f32,
    pub speed: f32,
    pub temp: f32,
    pub sal: f32,
    pub pressure: f32,
    pub conductivity: f32,
    /// Flag code in the low byte, source code in the next one.
    pub flags: u32,
}

#[binrw]
#[brw(little)]
#[derive(Clone, Debug, PartialEq)]
pub struct Cast {
    pub latitude: f64,
    pub longitude: f64,
    #[br(assert(count >= 0, "negative sample count {}", count))]
    pub count: i32,
    #[br(count = count as usize)]
    pub records: Vec<CastRecord>,
}

impl CastRecord {
    fn pack_flags(flag: Flag, source: Source) -> u32 {
        u32::from(flag.code()) | (u32::from(source.code()) << 8)
    }

    fn from_row(idx: i32, row: &SampleRow) -> Self {
        Self {
            idx,
            depth: row.depth as f32,
            speed: row.speed as f32,
            temp: row.temp as f32,
            sal: row.sal as f32,
            pressure: row.pressure as f32,
            conductivity: row.conductivity as f32,
            flags: Self::pack_flags(row.flag, row.source),
        }
    }

    fn to_row(&self) -> Result<SampleRow, FormatError> {
        let flag = Flag::try_from((self.flags & 0xff) as u8).map_err(ProfileError::from)?;
        let source = Source::try_from(((self.flags >> 8) & 0xff) as u8).map_err(ProfileError::from)?;
        Ok(SampleRow {
            pressure: f64::from(self.pressure),
            depth: f64::from(self.depth),
            speed: f64::from(self.speed),
            temp: f64::from(self.temp),
            conductivity: f64::from(self.conductivity),
            sal: f64::from(self.sal),
            source,
            flag,
        })
    }
}

impl Cast {
    fn from_profile(profile: &Profile, path: &Path) -> Result<Self, FormatError> {
        let samples = &profile.proc;
        if samples.is_empty() {
            return Err(ProfileError::EmptySamples("proc").into());
        }
        let count = i32::try_from(samples.num_samples())
            .map_err(|_| FormatError::TooManySamples(path.to_path_buf(), samples.num_samples()))?;
        let records = (0..samples.num_samples())
            .filter_map(|i| samples.row(i).map(|row| CastRecord::from_row(i as i32, &row)))
            .collect();
        Ok(Self {
            latitude: profile.meta.latitude().unwrap_or(f64::NAN),
            longitude: profile.meta.longitude().unwrap_or(f64::NAN),
            count,
            records,
        })
    }

    fn into_profile(self) -> Result<Profile, FormatError> {
        let mut records = self.records;
        records.sort_by_key(|r| r.idx);
        let rows = records
            .iter()
            .map(CastRecord::to_row)
            .collect::<Result<Vec<_>, _>>()?;
        let mut profile = Profile::new();
        if self.latitude.is_finite() && self.longitude.is_finite() {
            profile.meta.set_position(self.latitude, self.longitude)?;
        }
        profile.data = Samples::from_rows(&rows);
        Ok(profile)
    }
}

/// Casts of a binary stream. Iteration ends cleanly only when the stream
/// ends exactly on a cast boundary; a partial cast is an error.
pub struct CastIter<R: Read + Seek> {
    reader: R,
    cast_start: u64,
}

impl<R: Read + Seek> CastIter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            cast_start: 0,
        }
    }

    /// Byte offset of the last cast read or attempted.
    pub fn cast_start(&self) -> u64 {
        self.cast_start
    }

    fn at_end(&mut self) -> std::io::Result<bool> {
        let pos = self.reader.stream_position()?;
        let end = self.reader.seek(SeekFrom::End(0))?;
        self.reader.seek(SeekFrom::Start(pos))?;
        self.cast_start = pos;
        Ok(pos >= end)
    }
}

impl<R: Read + Seek> Iterator for CastIter<R> {
    type Item = BinResult<Cast>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.at_end() {
            Ok(true) => None,
            Ok(false) => Some(Cast::read(&mut self.reader)),
            Err(e) => Some(Err(e.into())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BsvpReader;

/// Appends the `proc` samples of a profile, flags included, as one cast.
#[derive(Clone, Copy, Debug, Default)]
pub struct BsvpWriter;

impl FormatReader for BsvpReader {
    fn read(
        &self,
        path: &Path,
        settings: &ProcessingSettings,
        callbacks: &mut dyn Callbacks,
    ) -> Result<ProfileList, FormatError> {
        let bytes = read_binary(path)?;
        let mut profiles = ProfileList::new();
        let mut casts = CastIter::new(Cursor::new(bytes));
        while let Some(cast) = casts.next() {
            let cast = match cast {
                Ok(cast) => cast,
                Err(e) if e.is_eof() => {
                    warn!(
                        "{}: cast at byte {} is truncated",
                        path.display(),
                        casts.cast_start()
                    );
                    return Err(FormatError::TruncatedCast(
                        path.to_path_buf(),
                        casts.cast_start(),
                    ));
                }
                Err(e) => return Err(e.into()),
            };
            trace!("cast with {} records", cast.count);
            profiles.append(cast.into_profile()?);
        }
        debug!("{}: {} casts", path.display(), profiles.len());
        finalize_profiles(&mut profiles, path, settings, callbacks)?;
        info!("Read {} BSVP casts from {}", profiles.len(), path.display());
        Ok(profiles)
    }
}

impl FormatWriter for BsvpWriter {
    fn write(&self, profile: &Profile, path: &Path) -> Result<(), FormatError> {
        let cast = Cast::from_profile(profile, path)?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        cast.write(&mut writer)?;
        writer.flush()?;
        info!("Appended {} samples to {}", cast.count, path.display());
        Ok(())
    }
}
