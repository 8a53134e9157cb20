//! Onset-aligned summary of every regressor's selected events.
//!
//! The three-column frames of a session are outer-joined on onset. Each
//! regressor contributes a `<name>_duration` and a `<name>_modulation`
//! column; a regressor with no event at an onset leaves both cells empty,
//! and several events of one regressor at the same onset multiply the
//! rows of that onset as a relational join would.

use std::{fs::File, io, path::Path};

use crate::regressor::ThreeColumnEvents;

#[derive(Debug, Clone, PartialEq)]
pub struct SimplifiedEvents {
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl SimplifiedEvents {
    #[must_use]
    pub fn build<'a, I>(frames: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a ThreeColumnEvents)>,
    {
        let frames = frames.into_iter().collect::<Vec<_>>();
        let mut columns = vec!["onset".to_owned()];
        for (name, _) in &frames {
            columns.push(format!("{name}_duration"));
            columns.push(format!("{name}_modulation"));
        }

        let mut onsets = frames
            .iter()
            .flat_map(|(_, frame)| frame.onset.iter().copied())
            .collect::<Vec<_>>();
        onsets.sort_by(f64::total_cmp);
        onsets.dedup();

        let mut rows = Vec::new();
        for onset in onsets {
            let mut partial: Vec<Vec<Option<f64>>> = vec![vec![Some(onset)]];
            for (_, frame) in &frames {
                let matches = (0..frame.len())
                    .filter(|&i| frame.onset[i] == onset)
                    .map(|i| [Some(frame.duration[i]), Some(frame.modulation[i])])
                    .collect::<Vec<_>>();
                let cells = if matches.is_empty() {
                    vec![[None, None]]
                } else {
                    matches
                };
                partial = partial
                    .into_iter()
                    .flat_map(|row| {
                        cells.iter().map(move |cell| {
                            let mut row = row.clone();
                            row.extend(cell);
                            row
                        })
                    })
                    .collect();
            }
            rows.extend(partial);
        }
        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    /// Writes comma-separated values; missing cells are empty.
    pub fn write_csv<W>(&self, writer: W) -> Result<(), csv::Error>
    where
        W: io::Write,
    {
        let mut writer = csv::WriterBuilder::new().from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(
                row.iter()
                    .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save_csv<P>(&self, path: P) -> Result<(), csv::Error>
    where
        P: AsRef<Path>,
    {
        self.write_csv(File::create(path.as_ref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(onset: &[f64], modulation: &[f64]) -> ThreeColumnEvents {
        ThreeColumnEvents {
            onset: onset.to_vec(),
            duration: vec![1.0; onset.len()],
            modulation: modulation.to_vec(),
        }
    }

    #[test]
    fn test_outer_join_on_onset() {
        let go = frame(&[4.0, 0.0], &[1.0, 1.0]);
        let rt = frame(&[0.0], &[-0.1]);
        let events = SimplifiedEvents::build([("go", &go), ("response_time", &rt)]);
        assert_eq!(
            events.columns(),
            [
                "onset",
                "go_duration",
                "go_modulation",
                "response_time_duration",
                "response_time_modulation",
            ]
        );
        assert_eq!(
            events.rows(),
            [
                vec![Some(0.0), Some(1.0), Some(1.0), Some(1.0), Some(-0.1)],
                vec![Some(4.0), Some(1.0), Some(1.0), None, None],
            ]
        );
    }

    #[test]
    fn test_duplicate_onsets_multiply() {
        let a = frame(&[2.0, 2.0], &[1.0, 2.0]);
        let b = frame(&[2.0, 2.0], &[3.0, 4.0]);
        let empty = ThreeColumnEvents::default();
        let events = SimplifiedEvents::build([("a", &a), ("b", &b), ("empty", &empty)]);
        assert_eq!(events.rows().len(), 4);
        assert!(events.rows().iter().all(|row| row[5].is_none()));
    }

    #[test]
    fn test_csv_leaves_missing_cells_empty() {
        let go = frame(&[1.5], &[1.0]);
        let stop = frame(&[3.0], &[1.0]);
        let events = SimplifiedEvents::build([("go", &go), ("stop", &stop)]);
        let mut out = Vec::new();
        events.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "onset,go_duration,go_modulation,stop_duration,stop_modulation\n\
             1.5,1,1,,\n\
             3,,,1,1\n"
        );
    }

    #[test]
    fn test_save_csv_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simplified_events.csv");
        let go = frame(&[1.5], &[1.0]);
        SimplifiedEvents::build([("go", &go)]).save_csv(&path).unwrap();
        assert!(std::fs::read_to_string(path).unwrap().starts_with("onset,"));
    }
}
