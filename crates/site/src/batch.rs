//! Parallel processing of many posts at once.

use crate::config::PipelineConfig;
use crate::error::ProcessError;
use crate::pipeline::{ProcessedPost, process};
use crate::post::Post;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

/// Options for batch processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to rayon's global pool.
    pub max_threads: Option<usize>,
    /// Whether to continue processing after an error. Defaults to true.
    pub continue_on_error: Option<bool>,
}

/// Result for a single post in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Slug of the input post.
    pub slug: String,
    /// Processed output (present on success).
    pub result: Option<ProcessedPost>,
    /// Error message (present on failure).
    pub error: Option<String>,
}

/// Statistics for batch processing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    /// Number of input posts.
    pub total: u32,
    /// Number of posts processed successfully.
    pub succeeded: u32,
    /// Number of posts that failed.
    pub failed: u32,
    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// All results, in input order, plus statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    /// One entry per processed post.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Processes `posts` in parallel with one shared configuration.
///
/// When `continue_on_error` is false, posts are processed sequentially and
/// processing stops after the first failure, so `results` may be shorter
/// than the input.
pub fn process_batch(posts: &[Post], config: &PipelineConfig, options: BatchOptions) -> BatchOutcome {
    process_batch_with(posts, options, |post| process(&post.content, config))
}

/// Like [`process_batch`], with a caller-supplied processing step.
pub fn process_batch_with<F>(posts: &[Post], options: BatchOptions, step: F) -> BatchOutcome
where
    F: Fn(&Post) -> Result<ProcessedPost, ProcessError> + Sync,
{
    let start = Instant::now();
    let continue_on_error = options.continue_on_error.unwrap_or(true);

    let pool = options.max_threads.and_then(|max_threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(max_threads)
            .build()
            .inspect_err(|err| log::warn!("Falling back to the global thread pool: {err}"))
            .ok()
    });

    let total = posts.len() as u32;
    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_post = |post: &Post| -> BatchResult {
        match step(post) {
            Ok(result) => {
                succeeded.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    slug: post.slug.clone(),
                    result: Some(result),
                    error: None,
                }
            }
            Err(err) => {
                failed.fetch_add(1, Ordering::Relaxed);
                log::warn!("Failed to process '{}': {err}", post.slug);
                BatchResult {
                    slug: post.slug.clone(),
                    result: None,
                    error: Some(err.to_string()),
                }
            }
        }
    };

    let results: Vec<BatchResult> = if continue_on_error {
        match pool {
            Some(pool) => pool.install(|| posts.par_iter().map(process_post).collect()),
            None => posts.par_iter().map(process_post).collect(),
        }
    } else {
        // Stopping at the first error needs a defined order.
        let mut results = Vec::with_capacity(posts.len());
        for post in posts {
            let result = process_post(post);
            let had_error = result.error.is_some();
            results.push(result);
            if had_error {
                break;
            }
        }
        results
    };

    let elapsed = start.elapsed();
    log::debug!("Processed {} posts in {:?}", results.len(), elapsed);

    BatchOutcome {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(slug: &str, content: &str) -> Post {
        Post {
            id: 1,
            slug: slug.to_string(),
            title: slug.to_string(),
            excerpt: String::new(),
            content: content.to_string(),
            published_at: Utc::now(),
            reading_time: String::new(),
            cover_image: None,
            tags: Vec::new(),
        }
    }

    fn posts(count: usize) -> Vec<Post> {
        (0..count)
            .map(|i| post(&format!("post-{i}"), &format!("## Section {i}\nBody")))
            .collect()
    }

    #[test]
    fn results_keep_input_order() {
        let outcome = process_batch(&posts(16), &PipelineConfig::default(), BatchOptions::default());

        assert_eq!(outcome.stats.total, 16);
        assert_eq!(outcome.stats.succeeded, 16);
        assert_eq!(outcome.stats.failed, 0);
        for (i, result) in outcome.results.iter().enumerate() {
            assert_eq!(result.slug, format!("post-{i}"));
            let processed = result.result.as_ref().expect("processed");
            assert_eq!(processed.toc[0].id, format!("section-{i}"));
        }
    }

    #[test]
    fn dedicated_pool() {
        let options = BatchOptions {
            max_threads: Some(2),
            ..BatchOptions::default()
        };
        let outcome = process_batch(&posts(5), &PipelineConfig::default(), options);
        assert_eq!(outcome.results.len(), 5);
        assert_eq!(outcome.stats.succeeded, 5);
    }

    #[test]
    fn sequential_mode_processes_everything_without_errors() {
        let options = BatchOptions {
            continue_on_error: Some(false),
            ..BatchOptions::default()
        };
        let outcome = process_batch(&posts(3), &PipelineConfig::default(), options);
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.results.iter().all(|r| r.error.is_none()));
    }

    fn fail_on(slug: &'static str) -> impl Fn(&Post) -> Result<ProcessedPost, ProcessError> + Sync {
        move |post| {
            if post.slug == slug {
                Err(ProcessError::Rewrite(
                    lol_html::errors::RewritingError::ContentHandlerError("handler failed".into()),
                ))
            } else {
                process(&post.content, &PipelineConfig::default())
            }
        }
    }

    #[test]
    fn sequential_mode_stops_after_first_failure() {
        let options = BatchOptions {
            continue_on_error: Some(false),
            ..BatchOptions::default()
        };
        let outcome = process_batch_with(&posts(5), options, fail_on("post-1"));

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.stats.total, 5);
        assert_eq!(outcome.stats.succeeded, 1);
        assert_eq!(outcome.stats.failed, 1);
        let failed = &outcome.results[1];
        assert_eq!(failed.slug, "post-1");
        assert!(failed.result.is_none());
        assert!(failed.error.as_deref().is_some_and(|e| e.starts_with("HTML rewriting failed")));
    }

    #[test]
    fn parallel_mode_reports_failures_per_post() {
        let outcome = process_batch_with(&posts(4), BatchOptions::default(), fail_on("post-2"));

        assert_eq!(outcome.results.len(), 4);
        assert_eq!(outcome.stats.succeeded, 3);
        assert_eq!(outcome.stats.failed, 1);
        assert!(outcome.results[2].error.is_some());
        assert!(outcome.results[3].result.is_some());
    }

    #[test]
    fn empty_batch() {
        let outcome = process_batch(&[], &PipelineConfig::default(), BatchOptions::default());
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.stats.total, 0);
    }

    #[test]
    fn options_from_json() {
        let options: BatchOptions =
            serde_json::from_str(r#"{"maxThreads":4}"#).expect("valid options");
        assert_eq!(options.max_threads, Some(4));
        assert_eq!(options.continue_on_error, None);
    }
}
