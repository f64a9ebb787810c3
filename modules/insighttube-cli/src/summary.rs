use insighttube_common::CanonicalSchema;
use insighttube_engine::metrics::{average_sentiment_score, engagement_rate, ranked_keywords};
use insighttube_engine::{OrchestratorState, ResultSource};

const TOP_TOPICS: usize = 5;
const TOP_KEYWORDS: usize = 10;

pub fn print_state(state: &OrchestratorState) {
    println!("Status: {:?}", state.phase);

    if let Some(error) = &state.error {
        println!("Error: {error}");
    }
    match state.source {
        Some(ResultSource::Live) => {}
        Some(ResultSource::Fallback) => {
            println!("Showing sample data; it does not describe the requested video.")
        }
        None => println!("No result available."),
    }

    if let Some(data) = &state.data {
        print_result(data);
    }
}

pub fn print_result(data: &CanonicalSchema) {
    let video = &data.video_data;
    println!();
    println!("{} ({})", video.title, video.channel);
    println!(
        "  {} · uploaded {} · {}",
        video.views, video.upload_date, video.duration
    );
    println!(
        "  likes {} · dislikes {} · comments {}",
        video.likes, video.dislikes, video.comments
    );
    match engagement_rate(video) {
        Some(rate) => println!("  engagement {rate:.2}%"),
        None => println!("  engagement N/A"),
    }
    println!("  processed in {:.1}s", video.processing_time_seconds);

    if !data.topics.is_empty() {
        println!();
        println!("Topics:");
        for topic in data.topics.iter().take(TOP_TOPICS) {
            println!(
                "  {:<24} {:>5.1}%  ({} mentions)",
                topic.topic, topic.relevance, topic.mentions
            );
        }
    }

    if !data.sentiment_distribution.is_empty() {
        println!();
        println!("Sentiment:");
        for share in &data.sentiment_distribution {
            println!("  {:<10} {:>5.1}%", share.name, share.value);
        }
    }

    if let Some(avg) = average_sentiment_score(&data.top_comments) {
        println!(
            "  average comment score {avg:+.3} over {} comments",
            data.top_comments.len()
        );
    }

    let keywords = ranked_keywords(&data.keywords, TOP_KEYWORDS);
    if !keywords.is_empty() {
        println!();
        let words: Vec<&str> = keywords.iter().map(|(word, _)| *word).collect();
        println!("Keywords: {}", words.join(", "));
    }
}
