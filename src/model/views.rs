use crate::prelude::*;

/// The persisted aggregate of one content item on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct DailyViews {
    pub content_id: String,
    pub day: Day,
    pub views: u64,
    pub unique_visitors: u64,
}

/// Counters summed over a window, either for one content item or across all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTotals {
    pub views: u64,
    pub unique_visitors: u64,
}

impl ViewTotals {
    pub fn add(&mut self, views: u64, unique_visitors: u64) {
        self.views += views;
        self.unique_visitors += unique_visitors;
    }
}

impl<'a> std::iter::Sum<&'a DailyViews> for ViewTotals {
    fn sum<I: Iterator<Item = &'a DailyViews>>(iter: I) -> Self {
        iter.fold(ViewTotals::default(), |mut totals, row| {
            totals.add(row.views, row.unique_visitors);
            totals
        })
    }
}

/// Result row of the group-by-content sum.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct ContentViews {
    pub content_id: String,
    pub views: u64,
    pub unique_visitors: u64,
}
