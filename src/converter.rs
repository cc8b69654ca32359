use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::{CacheKey, TranslationCache};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{Result, TranslateError};
use crate::llm::{GeminiClient, GenerationParams, ModelClient};
use crate::models::{HistoryEntry, RateLimitPolicy, RateWindow, SchemaSnapshot};
use crate::prompt::{PromptBuilder, PromptStrategy};
use crate::rate_limiter::RateLimiter;
use crate::sql::{sanitize, HeuristicValidator, LiteralNormalizer, QuoteNormalizer, ShapeValidator};

/// Natural-language to SQL converter
///
/// Owns every piece of mutable pipeline state (cache, rate window,
/// history). `translate` takes `&mut self`, so one instance serves one
/// translation at a time; give each concurrent caller its own instance.
///
/// Pipeline for a cache miss:
/// rate gate -> prompt -> model call -> sanitize -> normalize quotes -> validate -> cache
pub struct Converter {
    model: Option<Box<dyn ModelClient>>,
    prompt: PromptBuilder,
    params: GenerationParams,
    cache: TranslationCache,
    limiter: RateLimiter,
    normalizer: Box<dyn LiteralNormalizer>,
    validator: Box<dyn ShapeValidator>,
    history: Vec<HistoryEntry>,
    clock: Arc<dyn Clock>,
}

impl Converter {
    /// Create a converter around an optional model client
    ///
    /// `None` builds a permanently disabled converter: every `translate`
    /// fails with `NotConfigured`.
    pub fn new(model: Option<Box<dyn ModelClient>>, strategy: PromptStrategy) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            model,
            prompt: PromptBuilder::new(strategy),
            params: GenerationParams::default(),
            cache: TranslationCache::new(),
            limiter: RateLimiter::new(RateLimitPolicy::default(), clock.clone()),
            normalizer: Box::new(QuoteNormalizer),
            validator: Box::new(HeuristicValidator),
            history: Vec::new(),
            clock,
        }
    }

    /// Build a converter backed by Gemini from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let model: Option<Box<dyn ModelClient>> = match &config.api_key {
            Some(key) => {
                let client = GeminiClient::new(
                    key.clone(),
                    config.model.clone(),
                    Duration::from_secs(config.llm_timeout_secs),
                )?;
                tracing::info!("Gemini model {} enabled", config.model);
                Some(Box::new(client))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not configured; translation is disabled");
                None
            }
        };

        tracing::info!(
            "Target database: {}, prompt strategy: {}",
            config.target_database,
            config.prompt_strategy
        );

        let policy = RateLimitPolicy::new(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_window_secs),
        );

        Ok(Self::new(model, config.prompt_strategy).with_rate_limit(policy))
    }

    /// Replace the rate-limit policy; starts a fresh window
    pub fn with_rate_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.limiter = RateLimiter::new(policy, self.clock.clone());
        self
    }

    /// Replace the clock used for rate limiting and for cache and history timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        let policy = *self.limiter.policy();
        self.limiter = RateLimiter::new(policy, clock.clone());
        self.clock = clock;
        self
    }

    pub fn with_validator(mut self, validator: Box<dyn ShapeValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn LiteralNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_generation_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Translate a question into SQL for the given schema
    ///
    /// # Errors
    ///
    /// * `NotConfigured` - no model client; checked before the cache and rate limiter
    /// * `CollaboratorFailure` - the model call failed
    /// * `ValidationRejected` - the cleaned output is not plausible SQL; never cached
    pub fn translate(&mut self, question: &str, schema: &SchemaSnapshot) -> Result<String> {
        let started = Instant::now();

        let Some(model) = self.model.as_ref() else {
            return Err(TranslateError::NotConfigured);
        };

        let key = CacheKey::compute(question, schema);
        if let Some(sql) = self.cache.get(&key) {
            tracing::info!("Cache hit for key {}", key);
            let sql = sql.to_string();
            self.record(question, &sql, started, true);
            return Ok(sql);
        }

        let waited = self.limiter.acquire();
        if !waited.is_zero() {
            tracing::info!("Resumed after rate-limit wait of {:?}", waited);
        }

        let prompt = self.prompt.build(question, schema);
        tracing::debug!(
            "Built {} prompt ({} chars)",
            self.prompt.strategy(),
            prompt.chars().count()
        );

        let raw = model.generate(&prompt, &self.params).map_err(|e| match e {
            TranslateError::CollaboratorFailure(_) => e,
            other => TranslateError::CollaboratorFailure(other.to_string()),
        })?;
        tracing::debug!("Raw model output: {}", raw);

        let sanitized = sanitize(&raw);
        let sql = self.normalizer.normalize(&sanitized);

        if !self.validator.is_acceptable(&sql) {
            tracing::warn!("Rejected generated SQL: {}", sql);
            return Err(TranslateError::ValidationRejected(sql));
        }

        self.cache.put(key, sql.clone(), self.clock.now());
        self.record(question, &sql, started, false);
        tracing::info!("Translated in {:?}", started.elapsed());

        Ok(sql)
    }

    fn record(&mut self, question: &str, sql: &str, started: Instant, from_cache: bool) {
        self.history.push(HistoryEntry {
            question: question.trim().to_string(),
            sql: sql.to_string(),
            translated_at: self.clock.now(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            from_cache,
        });
    }

    /// Whether a model client is available
    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn strategy(&self) -> PromptStrategy {
        self.prompt.strategy()
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn rate_window(&self) -> &RateWindow {
        self.limiter.window()
    }

    /// Successful translations, oldest first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::sample_schema;
    use std::sync::Mutex;

    /// Returns queued replies in order and counts calls
    struct ScriptedModel {
        replies: Mutex<Vec<Result<String>>>,
        calls: Arc<Mutex<usize>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<String>>) -> (Self, Arc<Mutex<usize>>) {
            let calls = Arc::new(Mutex::new(0));
            let mut replies = replies;
            replies.reverse();
            (
                Self {
                    replies: Mutex::new(replies),
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl ModelClient for ScriptedModel {
        fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| {
                    Err(TranslateError::CollaboratorFailure("script exhausted".to_string()))
                })
        }
    }

    fn converter(replies: Vec<Result<String>>) -> (Converter, Arc<Mutex<usize>>) {
        let (model, calls) = ScriptedModel::new(replies);
        (Converter::new(Some(Box::new(model)), PromptStrategy::Reference), calls)
    }

    #[test]
    fn test_cache_hit_skips_model() {
        let (mut converter, calls) = converter(vec![
            Ok("SELECT name FROM instructor;".to_string()),
            Ok("SELECT * FROM course;".to_string()),
        ]);
        let schema = sample_schema();

        let first = converter.translate("Listar todos os professores", &schema).unwrap();
        let second = converter.translate("Listar todos os professores", &schema).unwrap();

        assert_eq!(first, "SELECT name FROM instructor;");
        assert_eq!(second, first);
        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(converter.rate_window().calls_in_window, 1);
        assert_eq!(converter.history().len(), 2);
        assert!(converter.history()[1].from_cache);
    }

    #[test]
    fn test_rejected_output_is_not_cached() {
        let (mut converter, calls) = converter(vec![
            Ok("SELECT;".to_string()),
            Ok("SELECT COUNT(*) FROM student;".to_string()),
        ]);
        let schema = sample_schema();

        let err = converter.translate("Quantos estudantes?", &schema).unwrap_err();
        assert!(matches!(err, TranslateError::ValidationRejected(ref sql) if sql == "SELECT;"));
        assert!(converter.cache().is_empty());

        // Retrying calls the model again
        let sql = converter.translate("Quantos estudantes?", &schema).unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM student;");
        assert_eq!(*calls.lock().unwrap(), 2);
        assert_eq!(converter.history().len(), 1);
    }

    #[test]
    fn test_model_failure_is_collaborator_failure() {
        let (mut converter, _) = converter(vec![Err(TranslateError::Schema("boom".to_string()))]);

        let err = converter
            .translate("Quem tem o maior salário?", &sample_schema())
            .unwrap_err();

        assert!(
            matches!(err, TranslateError::CollaboratorFailure(ref msg) if msg.contains("boom"))
        );
        assert!(converter.cache().is_empty());
        // The call still consumed a rate-limit slot
        assert_eq!(converter.rate_window().calls_in_window, 1);
    }

    #[test]
    fn test_unconfigured_converter_fails_first() {
        let mut converter = Converter::new(None, PromptStrategy::Reference);

        let err = converter.translate("Mostrar todos os estudantes", &sample_schema()).unwrap_err();

        assert!(matches!(err, TranslateError::NotConfigured));
        assert!(!converter.is_configured());
        assert_eq!(converter.rate_window().calls_in_window, 0);
        assert!(converter.cache().is_empty());
    }

    /// Records the sampling parameters of every call
    struct ParamsRecorder {
        seen: Arc<Mutex<Vec<GenerationParams>>>,
    }

    impl ModelClient for ParamsRecorder {
        fn generate(&self, _prompt: &str, params: &GenerationParams) -> Result<String> {
            self.seen.lock().unwrap().push(*params);
            Ok("SELECT dept_name FROM department;".to_string())
        }
    }

    #[test]
    fn test_generation_params_reach_model() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let model = ParamsRecorder { seen: seen.clone() };
        let params = GenerationParams {
            temperature: 0.0,
            max_output_tokens: 128,
            ..GenerationParams::default()
        };
        let mut converter = Converter::new(Some(Box::new(model)), PromptStrategy::Reference)
            .with_generation_params(params);

        converter.translate("Listar departamentos", &sample_schema()).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![params]);
    }

    #[test]
    fn test_cache_and_history_use_injected_clock() {
        let start = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = Arc::new(crate::clock::ManualClock::new(start));
        let (converter, _) = converter(vec![Ok("SELECT name FROM instructor;".to_string())]);
        let mut converter = converter.with_clock(clock);
        let schema = sample_schema();

        converter.translate("Listar todos os professores", &schema).unwrap();

        let key = CacheKey::compute("Listar todos os professores", &schema);
        assert_eq!(converter.cache().entry(&key).map(|e| e.created_at), Some(start));
        assert_eq!(converter.history()[0].translated_at, start);
    }

    #[test]
    fn test_from_config_without_key_is_disabled() {
        let config = Config {
            target_database: "sales".to_string(),
            prompt_strategy: PromptStrategy::Generic,
            rate_limit_requests: 5,
            ..Config::default()
        };

        let converter = Converter::from_config(&config).unwrap();

        assert!(!converter.is_configured());
        assert_eq!(converter.strategy(), PromptStrategy::Generic);
    }
}
