use insighttube_common::{
    CanonicalSchema, CommentInsight, Sentiment, SentimentSegment, SentimentShare, TopicScore,
    VideoData,
};

/// Fixed placeholder result installed when a live analysis fails.
///
/// Identical on every call and independent of the request, so consumers
/// always have a fully populated schema to render.
pub fn fallback_dataset() -> CanonicalSchema {
    CanonicalSchema {
        video_data: VideoData {
            title: "Sample YouTube Video Analysis".to_string(),
            channel: "Demo Channel".to_string(),
            views: "1.2M views".to_string(),
            upload_date: "2 days ago".to_string(),
            duration: "15:30".to_string(),
            likes: 45_000,
            dislikes: 1_200,
            comments: 8_500,
            processing_time_seconds: 45.2,
        },
        topics: vec![
            topic("Technology", 85.0, 120),
            topic("Innovation", 72.0, 95),
            topic("Future", 68.0, 80),
            topic("AI", 65.0, 75),
        ],
        sentiment_distribution: vec![
            share("Positive", 68.0, "#22c55e"),
            share("Neutral", 22.0, "#64748b"),
            share("Negative", 10.0, "#ef4444"),
        ],
        sentiment_timeline: vec![
            segment("0-25%", 65.0, 15.0, 20.0),
            segment("25-50%", 70.0, 10.0, 20.0),
            segment("50-75%", 68.0, 12.0, 20.0),
            segment("75-100%", 72.0, 8.0, 20.0),
        ],
        top_comments: vec![
            comment(
                "TechEnthusiast",
                "This is absolutely amazing! The future of technology looks so bright.",
                Sentiment::Positive,
                0.95,
                1_250,
            ),
            comment(
                "CuriousViewer",
                "Great explanation, but I wish there were more examples shown.",
                Sentiment::Neutral,
                0.15,
                890,
            ),
            comment(
                "SkepticalUser",
                "I'm not convinced this will work in practice. Too many limitations.",
                Sentiment::Negative,
                -0.75,
                320,
            ),
        ],
        keywords: [
            "technology",
            "innovation",
            "future",
            "AI",
            "machine learning",
            "automation",
            "digital",
            "trends",
            "development",
            "breakthrough",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    }
}

fn topic(topic: &str, relevance: f64, mentions: u64) -> TopicScore {
    TopicScore {
        topic: topic.to_string(),
        relevance,
        mentions,
    }
}

fn share(name: &str, value: f64, color: &str) -> SentimentShare {
    SentimentShare {
        name: name.to_string(),
        value,
        color: color.to_string(),
    }
}

fn segment(time: &str, positive: f64, negative: f64, neutral: f64) -> SentimentSegment {
    SentimentSegment {
        time: time.to_string(),
        positive,
        negative,
        neutral,
    }
}

fn comment(
    author: &str,
    text: &str,
    sentiment: Sentiment,
    sentiment_score: f64,
    likes: u64,
) -> CommentInsight {
    CommentInsight {
        author: author.to_string(),
        text: text.to_string(),
        sentiment,
        sentiment_score,
        likes,
    }
}
