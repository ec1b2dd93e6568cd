//! View helpers shared by the pages. Charts are drawn with plain widgets:
//! bars are progress bars, clickable segments are buttons.

use crate::i18n::{Language, TextKey};
use analytics::{
    ActivityGrid, CrossFilter, HourBucket, LabelDistribution, RadarProfile, ScatterSeries,
    SortField, SubredditSentiment, TableView, TopSubreddits, UNKNOWN_SERIES,
};
use iced::widget::{button, column, container, progress_bar, row, text, Column, Row, Space};
use iced::{theme, Alignment, Color, Element, Length};
use sentiview_core::{SentimentLabel, SentimentTone};

pub(crate) const POSITIVE: Color = Color {
    r: 0.18,
    g: 0.64,
    b: 0.35,
    a: 1.0,
};
pub(crate) const NEGATIVE: Color = Color {
    r: 0.86,
    g: 0.24,
    b: 0.24,
    a: 1.0,
};
const NEUTRAL: Color = Color {
    r: 0.55,
    g: 0.55,
    b: 0.6,
    a: 1.0,
};

pub fn tone_color(tone: SentimentTone) -> Color {
    match tone {
        SentimentTone::Positive => POSITIVE,
        SentimentTone::Negative => NEGATIVE,
        SentimentTone::Neutral => NEUTRAL,
    }
}

pub fn label_color(label: SentimentLabel) -> Color {
    match label {
        SentimentLabel::Positive => POSITIVE,
        SentimentLabel::Negative => NEGATIVE,
        SentimentLabel::Neutral => NEUTRAL,
    }
}

pub fn section<'a, M: 'a>(content: impl Into<Element<'a, M>>) -> Element<'a, M> {
    container(content)
        .padding(15)
        .width(Length::Fill)
        .style(theme::Container::Box)
        .into()
}

pub fn loading<'a, M: 'a>(language: Language) -> Element<'a, M> {
    section(text(language.text(TextKey::Loading)).size(18))
}

pub fn error_state<'a, M: 'a>(language: Language, message: &str) -> Element<'a, M> {
    let detail = if message.is_empty() {
        language.text(TextKey::UnknownError).to_string()
    } else {
        message.to_string()
    };

    section(
        column![
            text(language.text(TextKey::ErrorOccurred))
                .size(22)
                .style(NEGATIVE),
            text(language.text(TextKey::ErrorMessage)),
            text(format!("{}: {}", language.text(TextKey::Error), detail)),
        ]
        .spacing(8),
    )
}

pub fn empty_state<'a, M: 'a>(language: Language) -> Element<'a, M> {
    section(
        column![
            text(language.text(TextKey::NoDataFound)).size(22),
            text(language.text(TextKey::NoDataHint)),
            text(language.text(TextKey::TryDataTools)),
        ]
        .spacing(8),
    )
}

/// Titled card whose body is hidden when collapsed.
pub fn collapsible<'a, M: Clone + 'a>(
    title: &str,
    description: &str,
    expanded: bool,
    on_toggle: M,
    body: impl FnOnce() -> Element<'a, M>,
) -> Element<'a, M> {
    let header = row![
        text(title).size(18),
        Space::with_width(Length::Fill),
        button(text(if expanded { "▲" } else { "▼" })).on_press(on_toggle),
    ]
    .align_items(Alignment::Center);

    let mut content = Column::new().spacing(10).push(header);
    if expanded {
        content = content.push(text(description).size(13)).push(body());
    }
    section(content)
}

fn bar<'a, M: 'a>(fraction: f32) -> Element<'a, M> {
    progress_bar(0.0..=1.0, fraction.clamp(0.0, 1.0))
        .height(10.0)
        .width(Length::Fixed(220.0))
        .into()
}

fn fraction(part: usize, whole: usize) -> f32 {
    if whole == 0 {
        0.0
    } else {
        part as f32 / whole as f32
    }
}

/// Pie slices as clickable rows. The selected slice is marked.
pub fn label_distribution<'a, M: Clone + 'a>(
    language: Language,
    distribution: &LabelDistribution,
    selection: Option<&CrossFilter>,
    on_click: Option<&dyn Fn(SentimentLabel) -> M>,
) -> Element<'a, M> {
    if distribution.is_empty() {
        return text(language.text(TextKey::NoData)).into();
    }

    let total = distribution.total();
    let mut rows = Column::new().spacing(6);
    for (label, count) in distribution.entries() {
        let selected = selection == Some(&CrossFilter::Label(label));
        let caption = format!(
            "{}{}: {} ({:.1}%)",
            if selected { "● " } else { "" },
            language.label(label),
            count,
            fraction(count, total) * 100.0
        );
        let caption = text(caption).style(label_color(label));
        let caption: Element<'a, M> = match on_click {
            Some(on_click) => button(caption)
                .style(theme::Button::Text)
                .on_press(on_click(label))
                .into(),
            None => caption.into(),
        };
        rows = rows.push(
            row![caption, bar(fraction(count, total))]
                .spacing(10)
                .align_items(Alignment::Center),
        );
    }
    rows = rows.push(text(format!("{}: {}", language.text(TextKey::Total), total)).size(13));
    rows.into()
}

/// Hourly averages as clickable rows, oldest first.
pub fn hourly_trend<'a, M: Clone + 'a>(
    language: Language,
    trend: &[HourBucket],
    selection: Option<&CrossFilter>,
    on_click: Option<&dyn Fn(String) -> M>,
) -> Element<'a, M> {
    if trend.is_empty() {
        return text(language.text(TextKey::NoData)).into();
    }

    let mut rows = Column::new().spacing(4);
    for bucket in trend {
        let selected = selection == Some(&CrossFilter::Hour(bucket.hour.clone()));
        let caption = text(format!(
            "{}{}  {:+.3}  ({})",
            if selected { "● " } else { "" },
            bucket.hour,
            bucket.average_sentiment,
            bucket.count
        ))
        .style(tone_color(SentimentTone::from_sign(bucket.average_sentiment)));
        let caption: Element<'a, M> = match on_click {
            Some(on_click) => button(caption)
                .style(theme::Button::Text)
                .on_press(on_click(bucket.hour.clone()))
                .into(),
            None => caption.into(),
        };
        rows = rows.push(
            row![caption, bar(((bucket.average_sentiment + 1.0) / 2.0) as f32)]
                .spacing(10)
                .align_items(Alignment::Center),
        );
    }
    rows.into()
}

pub fn activity_heatmap<'a, M: 'a>(language: Language, grid: &ActivityGrid) -> Element<'a, M> {
    if grid.total() == 0 {
        return text(language.text(TextKey::NoData)).into();
    }

    let max = grid.max_cell();
    let mut header = Row::new().spacing(2).push(Space::with_width(Length::Fixed(110.0)));
    for hour in 0..24 {
        header = header.push(text(format!("{:02}", hour)).size(11).width(Length::Fixed(22.0)));
    }

    let mut rows = Column::new().spacing(2).push(header);
    for (day, cells) in grid.rows().iter().enumerate() {
        let mut line = Row::new()
            .spacing(2)
            .push(text(language.weekday(day)).size(12).width(Length::Fixed(110.0)));
        for &count in cells {
            let intensity = fraction(count, max);
            let shade = Color::from_rgb(0.9 - intensity * 0.8, 0.9 - intensity * 0.5, 1.0);
            let cell_text = if count == 0 { String::new() } else { count.to_string() };
            line = line.push(
                text(cell_text)
                    .size(11)
                    .width(Length::Fixed(22.0))
                    .style(shade),
            );
        }
        rows = rows.push(line);
    }
    rows.into()
}

pub fn top_subreddits<'a, M: 'a>(language: Language, top: &TopSubreddits) -> Element<'a, M> {
    if top.is_empty() {
        return text(language.text(TextKey::NoData)).into();
    }

    let max = top.ranked().first().map(|entry| entry.count).unwrap_or(1);
    let mut rows = Column::new().spacing(4);
    for entry in top.display_order() {
        rows = rows.push(
            row![
                text(format!("r/{}", entry.subreddit)).width(Length::Fixed(180.0)),
                bar(fraction(entry.count, max)),
                text(entry.count.to_string()),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
        );
    }
    rows.into()
}

pub fn radar<'a, M: 'a>(language: Language, profiles: &[RadarProfile]) -> Element<'a, M> {
    if profiles.is_empty() {
        return text(language.text(TextKey::NoData)).into();
    }

    let mut rows = Column::new().spacing(8).push(
        row![
            text(language.text(TextKey::Subreddit)).width(Length::Fixed(160.0)),
            text(language.text(TextKey::Sentiment)).width(Length::Fixed(110.0)),
            text(language.text(TextKey::Engagement)).width(Length::Fixed(110.0)),
            text(language.text(TextKey::Activity)).width(Length::Fixed(110.0)),
        ]
        .spacing(10),
    );
    for profile in profiles {
        rows = rows.push(
            row![
                text(format!("r/{}", profile.subreddit)).width(Length::Fixed(160.0)),
                text(format!("{:.2}", profile.sentiment)).width(Length::Fixed(110.0)),
                text(format!("{:.2}", profile.engagement)).width(Length::Fixed(110.0)),
                text(format!("{:.2}", profile.activity)).width(Length::Fixed(110.0)),
            ]
            .spacing(10),
        );
    }
    rows.into()
}

/// Per-series summary plus the most engaged points with their previews.
pub fn scatter<'a, M: 'a>(language: Language, series: &[ScatterSeries]) -> Element<'a, M> {
    if series.is_empty() {
        return text(language.text(TextKey::NoData)).into();
    }

    let mut rows = Column::new().spacing(10);
    for entry in series {
        let name = match SentimentLabel::parse(&entry.name) {
            Some(label) => language.label(label).to_string(),
            None if entry.name == UNKNOWN_SERIES => language.text(TextKey::Unknown).to_string(),
            None => entry.name.clone(),
        };
        let color = SentimentLabel::parse(&entry.name)
            .map(label_color)
            .unwrap_or(NEUTRAL);

        let mut block = Column::new()
            .spacing(2)
            .push(text(format!("{} ({})", name, entry.points.len())).style(color));

        let mut points: Vec<_> = entry.points.iter().collect();
        points.sort_by(|a, b| b.engagement_score.cmp(&a.engagement_score));
        for point in points.into_iter().take(3) {
            block = block.push(
                text(format!(
                    "{:+.2} / {} {}: {}",
                    point.sentiment_score,
                    point.engagement_score,
                    language.text(TextKey::Upvotes),
                    point.preview
                ))
                .size(12),
            );
        }
        rows = rows.push(block);
    }
    rows.into()
}

pub fn sentiment_by_subreddit<'a, M: 'a>(language: Language, rows: &[SubredditSentiment]) -> Element<'a, M> {
    if rows.is_empty() {
        return text(language.text(TextKey::NoData)).into();
    }

    let mut column = Column::new().spacing(4);
    for entry in rows {
        column = column.push(
            row![
                text(format!("r/{}", entry.subreddit)).width(Length::Fixed(180.0)),
                text(format!("{} {}", language.label(SentimentLabel::Positive), entry.positive))
                    .style(POSITIVE)
                    .width(Length::Fixed(130.0)),
                text(format!("{} {}", language.label(SentimentLabel::Neutral), entry.neutral))
                    .style(NEUTRAL)
                    .width(Length::Fixed(130.0)),
                text(format!("{} {}", language.label(SentimentLabel::Negative), entry.negative))
                    .style(NEGATIVE)
                    .width(Length::Fixed(130.0)),
            ]
            .spacing(10),
        );
    }
    column.into()
}

fn sort_header<'a, M: Clone + 'a>(
    language: Language,
    key: TextKey,
    field: SortField,
    table: &TableView<'_>,
    on_sort: &dyn Fn(SortField) -> M,
    width: f32,
) -> Element<'a, M> {
    let arrow = if table.sort.field == field {
        format!(" {}", table.sort.direction.arrow())
    } else {
        String::new()
    };
    button(text(format!("{}{}", language.text(key), arrow)).size(13))
        .style(theme::Button::Text)
        .on_press(on_sort(field))
        .width(Length::Fixed(width))
        .into()
}

fn preview(content: &str, limit: usize) -> String {
    if content.chars().count() <= limit {
        content.to_string()
    } else {
        let head: String = content.chars().take(limit).collect();
        format!("{}...", head)
    }
}

/// Sortable, paginated post table.
pub fn post_table<'a, M: Clone + 'a>(
    language: Language,
    table: &TableView<'_>,
    on_sort: &dyn Fn(SortField) -> M,
    on_previous: M,
    on_next: M,
) -> Element<'a, M> {
    let header = row![
        sort_header(language, TextKey::CreatedAt, SortField::CreatedAt, table, on_sort, 150.0),
        sort_header(language, TextKey::Sentiment, SortField::SentimentLabel, table, on_sort, 100.0),
        sort_header(language, TextKey::SentimentScore, SortField::SentimentScore, table, on_sort, 120.0),
        sort_header(language, TextKey::Subreddit, SortField::Subreddit, table, on_sort, 140.0),
        sort_header(language, TextKey::Score, SortField::EngagementScore, table, on_sort, 80.0),
        text(language.text(TextKey::Content)).size(13),
    ]
    .spacing(8);

    let mut rows = Column::new().spacing(4).push(header);
    for record in &table.rows {
        let created = record
            .created_at()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| record.created_utc.clone());
        let (label_text, color) = match record.label() {
            Some(label) => (language.label(label).to_string(), label_color(label)),
            None => (record.sentiment_label.clone().unwrap_or_default(), NEUTRAL),
        };
        let link = record
            .url
            .as_deref()
            .map(|url| format!("  [{}]", url))
            .unwrap_or_default();

        rows = rows.push(
            row![
                text(created).size(13).width(Length::Fixed(150.0)),
                text(label_text).size(13).style(color).width(Length::Fixed(100.0)),
                text(format!("{:.3}", record.sentiment_score)).size(13).width(Length::Fixed(120.0)),
                text(format!("r/{}", record.subreddit)).size(13).width(Length::Fixed(140.0)),
                text(record.engagement_score.to_string()).size(13).width(Length::Fixed(80.0)),
                text(format!("{}{}", preview(record.content_text(), 120), link)).size(13),
            ]
            .spacing(8),
        );
    }

    let previous = button(text(language.text(TextKey::Previous)));
    let previous = if table.has_previous { previous.on_press(on_previous) } else { previous };
    let next = button(text(language.text(TextKey::Next)));
    let next = if table.has_next { next.on_press(on_next) } else { next };

    let pager = row![
        previous,
        text(format!(
            "{} {} {} {}",
            language.text(TextKey::Page),
            table.current_page,
            language.text(TextKey::Of),
            table.total_pages
        )),
        next,
    ]
    .spacing(12)
    .align_items(Alignment::Center);

    column![rows, pager].spacing(12).into()
}
