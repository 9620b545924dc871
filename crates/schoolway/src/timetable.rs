use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::apsp::PairRoutes;
use crate::graph::{Graph, GROUND};
use crate::routing::serialize::route_to_string;
use crate::routing::types::SENIOR_ID_LIMIT;
use crate::state::RouteTable;

/// Weekly timetable: student -> day -> slot ("1".."10") -> room name.
///
/// Slots 1-5 are the morning block. The afternoon block starts at slot 7 but
/// surfaces as daily period index 7; daily index 6 is the lunch gap and is
/// never a class.
pub type Timetable = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

pub fn load(path: &Path) -> Result<Timetable> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to open timetable {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse timetable {}", path.display()))
}

/// Expand a weekly timetable into the initial route table.
///
/// Students are independent, so the expansion fans out across them; the
/// result is collected back into sorted maps, making the output
/// byte-deterministic for identical inputs.
pub fn expand(graph: &Graph, table: &PairRoutes, timetable: &Timetable) -> RouteTable {
    timetable
        .par_iter()
        .map(|(student, week)| {
            let senior = is_senior(student);
            let days = week
                .iter()
                .map(|(day, classes)| (day.clone(), expand_day(graph, table, classes, senior)))
                .collect();
            (student.clone(), days)
        })
        .collect()
}

/// Students with numeric ids below the senior cutoff return to ground for
/// lunch; everyone else stays put. Non-numeric ids get the stay-put rule.
fn is_senior(student: &str) -> bool {
    student
        .parse::<u32>()
        .map(|id| id < SENIOR_ID_LIMIT)
        .unwrap_or(false)
}

/// Whether a room name is a tracked location (room-like prefix).
fn tracked(room: &str) -> bool {
    matches!(room.as_bytes().first(), Some(b'A' | b'B' | b'G'))
}

/// Routes for one student-day, keyed by daily period index "0".."11".
///
/// Untracked rooms and missing slots leave the period's cell unset; an empty
/// string means the student stays where they are. Period 0 is the morning
/// arrival from ground, period 11 the end-of-day return, period 6 the lunch
/// gap, period 7 the return from lunch to the first afternoon class.
fn expand_day(
    graph: &Graph,
    table: &PairRoutes,
    classes: &BTreeMap<String, String>,
    senior: bool,
) -> BTreeMap<String, String> {
    let mut today = BTreeMap::new();

    if let Some(first) = classes.get("1") {
        if let Some(route) = pair_route(graph, table, GROUND, first) {
            today.insert("0".to_owned(), route);
        }
    }
    if let Some(first_afternoon) = classes.get("7") {
        if let Some(route) = pair_route(graph, table, GROUND, first_afternoon) {
            today.insert("7".to_owned(), route);
        }
    }

    for period in 1..=11usize {
        if period == 7 {
            continue; // handled above; afternoon slots shift down by one
        }

        if period == 6 {
            // The lunch gap. Slot 6 is the reserved between-block key and
            // is usually absent; the walk to lunch then starts from the
            // last morning room. Seniors head down to ground, everyone
            // else stays where they are.
            let Some(room) = classes.get("6").or_else(|| classes.get("5")) else {
                continue;
            };
            if !tracked(room) {
                continue;
            }
            let route = if senior && room != GROUND {
                pair_route(graph, table, room, GROUND).unwrap_or_default()
            } else {
                String::new()
            };
            today.insert("6".to_owned(), route);
            continue;
        }

        let offset = usize::from(period > 7);
        let Some(room) = classes.get(&(period - offset).to_string()) else {
            continue;
        };
        if !tracked(room) {
            continue;
        }

        if period == 11 {
            if let Some(route) = pair_route(graph, table, room, GROUND) {
                today.insert("11".to_owned(), route);
            }
            continue;
        }

        let Some(next_room) = classes.get(&(period - offset + 1).to_string()) else {
            continue;
        };
        if !tracked(next_room) {
            continue;
        }
        if next_room == room {
            today.insert(period.to_string(), String::new());
        } else if let Some(route) = pair_route(graph, table, room, next_room) {
            today.insert(period.to_string(), route);
        }
    }

    today
}

fn pair_route(graph: &Graph, table: &PairRoutes, from: &str, to: &str) -> Option<String> {
    let from = graph.id(from)?;
    let to = graph.id(to)?;
    Some(route_to_string(graph, table.get(&(from, to))?))
}
