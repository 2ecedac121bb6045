//! The week view: one tile per day starting at the base date, each showing
//! the activity of that day's active board.

use shared::{Activity, Board, DateIdentifier};
use std::sync::Arc;
use tracing::debug;

use super::catalog::{resolve_image, ActivityCatalog, ImageSource};
use super::date_resolver::{target_identifier, weekday_name};
use super::identity::find_active;
use crate::storage::BoardStorage;

pub const DEFAULT_WEEK_LENGTH: u32 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct WeekDay {
    pub day_offset: u32,
    pub date: DateIdentifier,
    pub day_name: &'static str,
    pub board_id: Option<String>,
    pub title: Option<String>,
    pub activity: Option<Activity>,
    pub image: Option<ImageSource>,
}

impl WeekDay {
    pub fn is_planned(&self) -> bool {
        self.activity.is_some()
    }
}

/// Lay out `week_length` days from `base` using the boards in `boards`
pub fn build_week(
    boards: &[Board],
    catalog: &dyn ActivityCatalog,
    base: DateIdentifier,
    week_length: u32,
) -> Vec<WeekDay> {
    (0..week_length)
        .map(|day_offset| {
            let date = target_identifier(base, day_offset);
            let board = find_active(boards, base, day_offset);
            let activity = board.and_then(Board::canonical_activity).cloned();
            WeekDay {
                day_offset,
                date,
                day_name: weekday_name(date.date()),
                board_id: board.map(|b| b.id.clone()),
                title: board.map(|b| b.title.clone()),
                image: activity.as_ref().and_then(|a| resolve_image(catalog, a)),
                activity,
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct WeekOverviewService {
    store: Arc<dyn BoardStorage>,
    catalog: Arc<dyn ActivityCatalog>,
    week_length: u32,
}

impl WeekOverviewService {
    pub fn new(store: Arc<dyn BoardStorage>, catalog: Arc<dyn ActivityCatalog>, week_length: u32) -> Self {
        Self {
            store,
            catalog,
            week_length,
        }
    }

    /// Read the store fresh and lay out the week starting at `base`
    pub async fn load(&self, base: DateIdentifier) -> Vec<WeekDay> {
        let boards = self.store.list_all().await;
        let week = build_week(&boards, self.catalog.as_ref(), base, self.week_length);
        debug!(
            "Week from {}: {} of {} days planned",
            base,
            week.iter().filter(|d| d.is_planned()).count(),
            week.len()
        );
        week
    }
}
