use sentiview_core::{SentimentLabel, Timeframe};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Lt,
}

impl Language {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "lt" => Some(Language::Lt),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Lt => "lt",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Lt,
            Language::Lt => Language::En,
        }
    }

    pub fn text(self, key: TextKey) -> &'static str {
        match self {
            Language::En => english(key),
            Language::Lt => lithuanian(key),
        }
    }

    pub fn label(self, label: SentimentLabel) -> &'static str {
        self.text(match label {
            SentimentLabel::Positive => TextKey::Positive,
            SentimentLabel::Negative => TextKey::Negative,
            SentimentLabel::Neutral => TextKey::Neutral,
        })
    }

    pub fn timeframe(self, timeframe: Timeframe) -> &'static str {
        self.text(match timeframe {
            Timeframe::Last24Hours => TextKey::Hours24,
            Timeframe::Last7Days => TextKey::Days7,
            Timeframe::Last30Days => TextKey::Days30,
        })
    }

    /// Monday is index 0.
    pub fn weekday(self, index: usize) -> &'static str {
        const DAYS: [TextKey; 7] = [
            TextKey::Monday,
            TextKey::Tuesday,
            TextKey::Wednesday,
            TextKey::Thursday,
            TextKey::Friday,
            TextKey::Saturday,
            TextKey::Sunday,
        ];
        DAYS.get(index).map(|key| self.text(*key)).unwrap_or("")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code().to_uppercase())
    }
}

/// Every user-visible string. Adding a variant forces a translation in
/// each locale table below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    AppTitle,
    Dashboard,
    DataTable,
    Comparison,
    DataTools,
    Refresh,

    FilterBySubreddit,
    FilterByGroup,
    SearchKeywords,
    KeywordsPlaceholder,
    MinScore,
    Search,
    ClearFilter,
    AllSubreddits,
    AllGroups,
    SentimentOverview,
    EngagementAndComparison,

    TotalPosts,
    AvgSentiment,
    MostPositive,
    MostNegative,
    StatsLoading,
    StatsUnavailable,

    SentimentDistribution,
    Total,
    TopSubreddits,
    PostCount,
    SentimentOverTime,
    ActivityHeatmap,
    SentimentBySubreddit,
    SentimentVsEngagement,
    SubredditComparison,
    SentimentPieDesc,
    SentimentTimeDesc,
    SubredditBarDesc,
    ActivityHeatmapDesc,
    SentimentStackedDesc,
    RadarChartDesc,

    Positive,
    Negative,
    Neutral,
    Unknown,

    Loading,
    NoData,
    NoDataFound,
    NoDataHint,
    TryDataTools,
    ErrorOccurred,
    ErrorMessage,
    Error,
    UnknownError,

    Subreddit,
    Score,
    Sentiment,
    SentimentScore,
    CreatedAt,
    Content,
    Link,

    DataExplorer,
    FilteredByClick,
    Showing,
    Items,
    ClickPlotToClear,
    ClickPlotToFilter,

    FullDataTable,
    ShowingAllItems,
    FromLast7Days,
    Of,
    Page,
    Previous,
    Next,

    ComparisonSubtitle,
    SelectSubreddit,
    SelectTimeframe,
    PanelA,
    PanelB,
    Hours24,
    Days7,
    Days30,

    AverageSentiment,
    Upvotes,
    Engagement,
    Activity,

    DataFetchingTools,
    DataToolsIntro,
    FetchFromSubreddit,
    FetchFromSubredditDesc,
    SubredditPlaceholder,
    Fetch,
    Fetching,
    FetchRandomTitle,
    FetchRandomDesc,
    FetchRandom,

    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

fn english(key: TextKey) -> &'static str {
    use TextKey::*;
    match key {
        AppTitle => "NLP Analyzer",
        Dashboard => "Dashboard",
        DataTable => "Data Table",
        Comparison => "Comparison",
        DataTools => "Data Tools",
        Refresh => "Refresh",

        FilterBySubreddit => "Filter by Subreddit",
        FilterByGroup => "Filter by Group",
        SearchKeywords => "Search Keywords",
        KeywordsPlaceholder => "e.g. crypto, biden",
        MinScore => "Min Score",
        Search => "Search",
        ClearFilter => "Clear Filter",
        AllSubreddits => "All Subreddits",
        AllGroups => "All Groups",
        SentimentOverview => "Sentiment Overview",
        EngagementAndComparison => "Engagement & Comparison",

        TotalPosts => "Total Posts",
        AvgSentiment => "Avg. Sentiment",
        MostPositive => "Most Positive",
        MostNegative => "Most Negative",
        StatsLoading => "Loading stats...",
        StatsUnavailable => "Stats unavailable",

        SentimentDistribution => "Overall Sentiment Distribution",
        Total => "Total",
        TopSubreddits => "Top 10 Active Subreddits",
        PostCount => "Post Count",
        SentimentOverTime => "Sentiment Trends Over Time",
        ActivityHeatmap => "Activity Heatmap (Day vs Hour)",
        SentimentBySubreddit => "Sentiment Distribution per Subreddit",
        SentimentVsEngagement => "Sentiment vs Engagement",
        SubredditComparison => "Subreddit Comparison",
        SentimentPieDesc => "Overall distribution of sentiment across all filtered posts.",
        SentimentTimeDesc => {
            "Trends in sentiment score over time. Useful for spotting spikes or drops in community mood."
        }
        SubredditBarDesc => "Top 10 most active subreddits by post count.",
        ActivityHeatmapDesc => {
            "Visualizes the intensity of posting activity across different days and hours."
        }
        SentimentStackedDesc => {
            "Breakdown of sentiment (Positive, Neutral, Negative) for each subreddit."
        }
        RadarChartDesc => {
            "Comparison of subreddits based on sentiment, engagement, and activity."
        }

        Positive => "Positive",
        Negative => "Negative",
        Neutral => "Neutral",
        Unknown => "Unknown",

        Loading => "Loading...",
        NoData => "No Data Available",
        NoDataFound => "No Data Found",
        NoDataHint => "We couldn't find any data for the selected time period.",
        TryDataTools => "Try fetching new data from the Data Tools page.",
        ErrorOccurred => "An Error Occurred",
        ErrorMessage => "We ran into a problem while trying to load your data.",
        Error => "Error",
        UnknownError => "An unknown error occurred.",

        Subreddit => "Subreddit",
        Score => "Score",
        Sentiment => "Sentiment",
        SentimentScore => "Sentiment Score",
        CreatedAt => "Created At",
        Content => "Content",
        Link => "Link",

        DataExplorer => "Data Explorer",
        FilteredByClick => "Filtered by click",
        Showing => "Showing",
        Items => "items",
        ClickPlotToClear => "Click the plot again to clear selection.",
        ClickPlotToFilter => "Click a plot segment to filter.",

        FullDataTable => "Full Data Table",
        ShowingAllItems => "Showing all",
        FromLast7Days => "items from the last 7 days.",
        Of => "of",
        Page => "Page",
        Previous => "Previous",
        Next => "Next",

        ComparisonSubtitle => "Analyze sentiment across different communities side-by-side.",
        SelectSubreddit => "Select Subreddit",
        SelectTimeframe => "Select Timeframe",
        PanelA => "Panel A",
        PanelB => "Panel B",
        Hours24 => "Last 24 Hours",
        Days7 => "Last 7 Days",
        Days30 => "Last 30 Days",

        AverageSentiment => "Average Sentiment",
        Upvotes => "Upvotes",
        Engagement => "Engagement",
        Activity => "Activity",

        DataFetchingTools => "Data Fetching Tools",
        DataToolsIntro => "Use these tools to add new data to the database on-demand.",
        FetchFromSubreddit => "Fetch from Specific Subreddit",
        FetchFromSubredditDesc => "Get the 50 newest 'hot' posts from a subreddit.",
        SubredditPlaceholder => "e.g., python, news, etc.",
        Fetch => "Fetch",
        Fetching => "Fetching...",
        FetchRandomTitle => "Fetch from Random Subreddits",
        FetchRandomDesc => "Get 10 posts each from 10 random subreddits.",
        FetchRandom => "Fetch Random",

        Monday => "Monday",
        Tuesday => "Tuesday",
        Wednesday => "Wednesday",
        Thursday => "Thursday",
        Friday => "Friday",
        Saturday => "Saturday",
        Sunday => "Sunday",
    }
}

fn lithuanian(key: TextKey) -> &'static str {
    use TextKey::*;
    match key {
        AppTitle => "NLP Analizatorius",
        Dashboard => "Skydelis",
        DataTable => "Duomenų Lentelė",
        Comparison => "Palyginimas",
        DataTools => "Duomenų Įrankiai",
        Refresh => "Atnaujinti",

        FilterBySubreddit => "Filtruoti pagal Subreddit",
        FilterByGroup => "Filtruoti pagal Grupę",
        SearchKeywords => "Ieškoti Raktažodžių",
        KeywordsPlaceholder => "pvz. crypto, biden",
        MinScore => "Min. Balas",
        Search => "Paieška",
        ClearFilter => "Išvalyti Filtrą",
        AllSubreddits => "Visi Subredditai",
        AllGroups => "Visos Grupės",
        SentimentOverview => "Nuotaikos Apžvalga",
        EngagementAndComparison => "Įsitraukimas ir Palyginimas",

        TotalPosts => "Viso Įrašų",
        AvgSentiment => "Vid. Nuotaika",
        MostPositive => "Pozityviausias",
        MostNegative => "Negatyviausias",
        StatsLoading => "Kraunama statistika...",
        StatsUnavailable => "Statistika nepasiekiama",

        SentimentDistribution => "Bendras Nuotaikų Pasiskirstymas",
        Total => "Viso",
        TopSubreddits => "Top 10 Aktyviausių Subreddit",
        PostCount => "Įrašų Skaičius",
        SentimentOverTime => "Nuotaikų Tendencijos Laike",
        ActivityHeatmap => "Aktyvumo Žemėlapis (Diena vs Valanda)",
        SentimentBySubreddit => "Nuotaikų Pasiskirstymas pagal Subreddit",
        SentimentVsEngagement => "Nuotaika vs Įsitraukimas",
        SubredditComparison => "Subreddit Palyginimas",
        SentimentPieDesc => "Bendras nuotaikų pasiskirstymas visuose filtruotuose įrašuose.",
        SentimentTimeDesc => {
            "Nuotaikų balų tendencijos laike. Naudinga pastebėti bendruomenės nuotaikos pokyčius."
        }
        SubredditBarDesc => "Top 10 aktyviausių subreddit pagal įrašų skaičių.",
        ActivityHeatmapDesc => {
            "Vizualizuoja įrašų aktyvumą skirtingomis dienomis ir valandomis."
        }
        SentimentStackedDesc => {
            "Nuotaikų (Teigiama, Neutrali, Neigiama) pasiskirstymas kiekviename subreddit."
        }
        RadarChartDesc => {
            "Subreddit palyginimas pagal nuotaiką, įsitraukimą ir aktyvumą."
        }

        Positive => "Teigiama",
        Negative => "Neigiama",
        Neutral => "Neutrali",
        Unknown => "Nežinoma",

        Loading => "Kraunama...",
        NoData => "Nėra Duomenų",
        NoDataFound => "Duomenų Nerasta",
        NoDataHint => "Pasirinktam laikotarpiui duomenų nerasta.",
        TryDataTools => "Pabandykite surinkti naujų duomenų Duomenų Įrankių puslapyje.",
        ErrorOccurred => "Įvyko Klaida",
        ErrorMessage => "Bandant įkelti duomenis, susidūrėme su problema.",
        Error => "Klaida",
        UnknownError => "Įvyko nežinoma klaida.",

        Subreddit => "Subreddit",
        Score => "Balas",
        Sentiment => "Nuotaika",
        SentimentScore => "Nuotaikos Balas",
        CreatedAt => "Sukurta",
        Content => "Turinys",
        Link => "Nuoroda",

        DataExplorer => "Duomenų Naršyklė",
        FilteredByClick => "Filtruota paspaudus",
        Showing => "Rodoma",
        Items => "elementai",
        ClickPlotToClear => "Spustelėkite diagramą dar kartą, kad išvalytumėte pasirinkimą.",
        ClickPlotToFilter => "Spustelėkite diagramos segmentą, kad filtruotumėte.",

        FullDataTable => "Visa Duomenų Lentelė",
        ShowingAllItems => "Rodoma visi",
        FromLast7Days => "elementai iš paskutinių 7 dienų.",
        Of => "iš",
        Page => "Puslapis",
        Previous => "Ankstesnis",
        Next => "Kitas",

        ComparisonSubtitle => "Analizuokite nuotaikas skirtingose bendruomenėse greta.",
        SelectSubreddit => "Pasirinkti Subreddit",
        SelectTimeframe => "Pasirinkti Laikotarpį",
        PanelA => "Panelė A",
        PanelB => "Panelė B",
        Hours24 => "Paskutinės 24 Valandos",
        Days7 => "Paskutinės 7 Dienos",
        Days30 => "Paskutinės 30 Dienų",

        AverageSentiment => "Vidutinė Nuotaika",
        Upvotes => "Balsai (Upvotes)",
        Engagement => "Įsitraukimas",
        Activity => "Aktyvumas",

        DataFetchingTools => "Duomenų Rinkimo Įrankiai",
        DataToolsIntro => "Naudokite šiuos įrankius, kad pagal poreikį pridėtumėte naujų duomenų.",
        FetchFromSubreddit => "Rinkti iš Konkretaus Subreddit",
        FetchFromSubredditDesc => "Gauti 50 naujausių populiarių įrašų iš subreddit.",
        SubredditPlaceholder => "pvz., python, news ir t.t.",
        Fetch => "Rinkti",
        Fetching => "Renkama...",
        FetchRandomTitle => "Rinkti iš Atsitiktinių Subreddit",
        FetchRandomDesc => "Gauti po 10 įrašų iš 10 atsitiktinių subreddit.",
        FetchRandom => "Rinkti Atsitiktinai",

        Monday => "Pirmadienis",
        Tuesday => "Antradienis",
        Wednesday => "Trečiadienis",
        Thursday => "Ketvirtadienis",
        Friday => "Penktadienis",
        Saturday => "Šeštadienis",
        Sunday => "Sekmadienis",
    }
}
