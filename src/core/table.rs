//! CSV decoding of the participant table and encoding of the result tables.

use crate::domain::model::{AllocationReport, Assignment, CapacityRow, Participant, RankRow};
use crate::utils::error::{AllocError, Result};
use std::collections::{HashMap, HashSet};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const ASSIGNED_ACTIVITY_HEADER: &str = "AssignedActivity";
pub const ACHIEVED_RANK_HEADER: &str = "AchievedRank";

/// Decodes participants from a CSV table with a header row.
///
/// Columns other than the two named ones are carried along unchanged. Short
/// rows are accepted and yield empty values.
pub fn read_participants(
    data: &[u8],
    participant_column: &str,
    preferences_column: &str,
) -> Result<Vec<Participant>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                AllocError::validation(format!(
                    "Missing required column '{}' (found: {})",
                    name,
                    headers.iter().collect::<Vec<_>>().join(", ")
                ))
            })
    };
    let id_index = column(participant_column)?;
    let prefs_index = column(preferences_column)?;
    let extra_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != id_index && *i != prefs_index)
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut participants = Vec::new();
    let mut seen = HashSet::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // 表頭是第 1 行
        let line = i + 2;
        let id = record.get(id_index).unwrap_or_default().trim();
        if id.is_empty() {
            return Err(AllocError::validation(format!(
                "Row {} has an empty '{}' value",
                line, participant_column
            )));
        }
        if !seen.insert(id.to_string()) {
            return Err(AllocError::validation(format!(
                "Row {} repeats participant '{}'",
                line, id
            )));
        }
        let extra_fields = extra_columns
            .iter()
            .map(|(i, header)| {
                (
                    header.clone(),
                    record.get(*i).unwrap_or_default().to_string(),
                )
            })
            .collect();
        participants.push(
            Participant::new(id, record.get(prefs_index)).with_extra_fields(extra_fields),
        );
    }

    tracing::debug!("Decoded {} participants", participants.len());
    Ok(participants)
}

/// Every participant in input order, blank activity and rank when unassigned.
///
/// The other input columns follow the preferences column.
pub fn write_assignments_csv(
    participants: &[Participant],
    report: &AllocationReport,
    participant_column: &str,
    preferences_column: &str,
) -> Result<Vec<u8>> {
    let by_participant: HashMap<&str, &Assignment> = report
        .assignments
        .iter()
        .map(|a| (a.participant.as_str(), a))
        .collect();

    let extra_headers: Vec<&str> = participants
        .first()
        .map(|p| p.extra_fields.iter().map(|(h, _)| h.as_str()).collect())
        .unwrap_or_default();

    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header = vec![
        participant_column,
        ASSIGNED_ACTIVITY_HEADER,
        ACHIEVED_RANK_HEADER,
        preferences_column,
    ];
    header.extend(&extra_headers);
    writer.write_record(&header)?;

    for participant in participants {
        let (activity, rank) = match by_participant.get(participant.id.as_str()) {
            Some(a) => (a.activity.clone(), a.rank.to_string()),
            None => (String::new(), String::new()),
        };
        let mut row = vec![
            participant.id.as_str(),
            activity.as_str(),
            rank.as_str(),
            participant.raw_preferences.as_str(),
        ];
        for name in &extra_headers {
            let value = participant
                .extra_fields
                .iter()
                .find(|(h, _)| h == name)
                .map_or("", |(_, v)| v.as_str());
            row.push(value);
        }
        writer.write_record(&row)?;
    }

    finish(writer)
}

pub fn write_capacity_csv(rows: &[CapacityRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    if rows.is_empty() {
        writer.write_record(["activity", "capacity", "filled", "remaining"])?;
    }
    finish(writer)
}

pub fn write_rank_distribution_csv(rows: &[RankRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["rank", "count", "percentage"])?;
    for row in rows {
        writer.write_record([
            row.rank.to_string(),
            row.count.to_string(),
            format!("{:.2}", row.percentage),
        ])?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| AllocError::IoError(e.into_error()))
}
