//! The generation orchestrator.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info};
use weft_codegen::{
    plan_structure, Assembler, CodeTasks, ComponentSynthesizer, FrameworkAdapter,
    HeuristicAnalyzer, Optimizer, PatternAnalyzer, QualityAssessor, SyntaxAdapter,
};
use weft_core::{BuildStatus, CoreError, DesignDocument, GeneratedArtifact, GenerationConfig};
use weft_dispatch::{Dispatcher, DEFAULT_TIMEOUT};
use weft_extract::DesignExtractor;

use crate::cache::{CacheStore, MemoryCache};
use crate::error::{PipelineError, Result};
use crate::fingerprint::fingerprint;
use crate::progress::{NoProgress, ProgressReporter};
use crate::session::{ActiveSessions, SessionHandle, SessionPhase};

/// Service-level settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// Serve repeated (document, config) pairs from the cache.
    pub cache_enabled: bool,
    /// Deadline for every dispatched task.
    pub dispatch_timeout: Duration,
    /// Deadline for analyzer and adapter calls; `None` waits indefinitely.
    pub collaborator_timeout: Option<Duration>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            dispatch_timeout: DEFAULT_TIMEOUT,
            collaborator_timeout: None,
        }
    }
}

/// Runs generation sessions end to end.
///
/// Owns one dispatcher shared by all sessions, the collaborators, and the
/// cache. Sessions may run concurrently; they share nothing but the cache
/// and the dispatcher.
pub struct Orchestrator {
    options: OrchestratorOptions,
    dispatcher: Arc<Dispatcher>,
    analyzer: Arc<dyn PatternAnalyzer>,
    adapter: Arc<dyn FrameworkAdapter>,
    cache: Arc<dyn CacheStore>,
    extractor: DesignExtractor,
    synthesizer: ComponentSynthesizer,
    assessor: QualityAssessor,
    optimizer: Optimizer,
    assembler: Assembler,
    sessions: ActiveSessions,
}

impl Orchestrator {
    /// Start an orchestrator with the default collaborators.
    ///
    /// Fails if the dispatcher cannot start.
    pub fn new(options: OrchestratorOptions) -> Result<Self> {
        let dispatcher = Arc::new(Dispatcher::with_timeout(
            CodeTasks::new(),
            options.dispatch_timeout,
        )?);

        Ok(Self {
            options,
            synthesizer: ComponentSynthesizer::with_dispatcher(Arc::clone(&dispatcher)),
            assembler: Assembler::new().with_dispatcher(Arc::clone(&dispatcher)),
            dispatcher,
            analyzer: Arc::new(HeuristicAnalyzer::new()),
            adapter: Arc::new(SyntaxAdapter::new()),
            cache: Arc::new(MemoryCache::new()),
            extractor: DesignExtractor::new(),
            assessor: QualityAssessor::new(),
            optimizer: Optimizer::new(),
            sessions: ActiveSessions::new(),
        })
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn PatternAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn FrameworkAdapter>) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the dispatcher used by synthesis and assembly.
    pub fn with_dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
        self.synthesizer = ComponentSynthesizer::with_dispatcher(Arc::clone(&dispatcher));
        self.assembler = Assembler::new().with_dispatcher(Arc::clone(&dispatcher));
        self.dispatcher = dispatcher;
        self
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// In-flight sessions.
    pub fn sessions(&self) -> &ActiveSessions {
        &self.sessions
    }

    pub fn active_session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Generate from a raw JSON design document.
    ///
    /// A `null` document is rejected with [`PipelineError::InvalidInput`].
    pub async fn generate_value(
        &self,
        document: Value,
        config: &GenerationConfig,
    ) -> Result<GeneratedArtifact> {
        let document = DesignDocument::from_value(document).map_err(|e| match e {
            CoreError::InvalidInput(message) => PipelineError::InvalidInput(message),
            other => PipelineError::Core(other),
        })?;
        self.generate(&document, config).await
    }

    pub async fn generate(
        &self,
        document: &DesignDocument,
        config: &GenerationConfig,
    ) -> Result<GeneratedArtifact> {
        self.generate_with_progress(document, config, &NoProgress).await
    }

    /// Generate, reporting progress at each phase boundary.
    pub async fn generate_with_progress(
        &self,
        document: &DesignDocument,
        config: &GenerationConfig,
        progress: &dyn ProgressReporter,
    ) -> Result<GeneratedArtifact> {
        config.validate()?;

        let key = fingerprint(document, config)?;
        if self.options.cache_enabled {
            if let Some(cached) = self.cache.get(&key).await? {
                info!(session = %cached.id, fingerprint = %key, "served from cache");
                progress.report(100, "Loaded from cache");
                return Ok(cached);
            }
        }

        let mut session = self.sessions.open();
        info!(
            session = %session.id(),
            framework = %config.framework,
            component = %config.component_name,
            "generation started"
        );

        match self.run(&mut session, document, config, progress).await {
            Ok(artifact) => {
                session.advance(SessionPhase::from_build_status(artifact.build_status));
                info!(
                    session = %session.id(),
                    status = %session.phase(),
                    files = artifact.files.len(),
                    overall = artifact.quality.overall(),
                    elapsed_ms = session.started().elapsed().as_millis() as u64,
                    "generation finished"
                );
                if self.options.cache_enabled {
                    self.cache.set(&key, &artifact).await?;
                }
                Ok(artifact)
            }
            Err(err) => {
                let failed_in = session.phase();
                session.advance(SessionPhase::Failed);
                error!(session = %session.id(), phase = %failed_in, error = %err, "generation failed");
                Err(err)
            }
        }
    }

    /// Stop the dispatcher. Blocks until queued tasks finish.
    pub fn shutdown(&self) {
        self.dispatcher.shutdown();
    }

    async fn run(
        &self,
        session: &mut SessionHandle,
        document: &DesignDocument,
        config: &GenerationConfig,
        progress: &dyn ProgressReporter,
    ) -> Result<GeneratedArtifact> {
        progress.report(0, "Starting generation");

        enter(session, progress, SessionPhase::Analyzing, 10, "Analyzing design");
        let (scene, tokens) = self.extractor.extract(document);
        let patterns = match document.root() {
            Some(root) => self.bounded("pattern analyzer", self.analyzer.analyze(root)).await?,
            None => Vec::new(),
        };
        debug!(
            session = %session.id(),
            shapes = scene.len(),
            patterns = patterns.len(),
            placeholder = scene.placeholder,
            "design analyzed"
        );

        enter(session, progress, SessionPhase::Planning, 20, "Planning code structure");
        let structure = plan_structure(&scene, &patterns, config);

        enter(session, progress, SessionPhase::Synthesizing, 35, "Synthesizing component");
        let ir = self
            .synthesizer
            .synthesize(&scene, &tokens, &patterns, config)
            .await;

        enter(session, progress, SessionPhase::Adapting, 50, "Adapting to framework");
        let output = self
            .bounded("framework adapter", self.adapter.adapt(&ir, config))
            .await?;

        enter(session, progress, SessionPhase::Assessing, 65, "Assessing quality");
        let mut quality = self.assessor.assess(&output, config);
        let suggestions = self
            .bounded("pattern analyzer", async {
                Ok::<_, weft_codegen::CodegenError>(self.analyzer.code_suggestions(&patterns).await)
            })
            .await?;
        quality.extend_recommendations(suggestions);

        enter(session, progress, SessionPhase::Optimizing, 80, "Optimizing output");
        let (output, optimizations) = self.optimizer.optimize(output, config, &quality);

        enter(session, progress, SessionPhase::Assembling, 90, "Assembling files");
        let assembly = self
            .assembler
            .assemble(&output, structure, &scene, config, session.started())
            .await?;
        let build_logs = self.assembler.validate_build(&assembly.files, config).await;
        let build_status = BuildStatus::from_logs(&build_logs);

        progress.report(100, "Generation complete");

        Ok(GeneratedArtifact {
            id: session.id().to_string(),
            timestamp: weft_codegen::now_millis(),
            config: config.clone(),
            files: assembly.files,
            structure: assembly.structure,
            metrics: assembly.metrics,
            quality,
            preview: assembly.preview,
            build_status,
            build_logs,
            optimizations,
        })
    }

    /// Await a collaborator call under the optional collaborator deadline.
    async fn bounded<T, F>(&self, collaborator: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = weft_codegen::Result<T>>,
    {
        match self.options.collaborator_timeout {
            Some(after) => tokio::time::timeout(after, call)
                .await
                .map_err(|_| PipelineError::CollaboratorTimeout {
                    collaborator,
                    after,
                })?
                .map_err(PipelineError::from),
            None => call.await.map_err(PipelineError::from),
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("options", &self.options)
            .field("active_sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

fn enter(
    session: &mut SessionHandle,
    progress: &dyn ProgressReporter,
    phase: SessionPhase,
    percent: u8,
    status: &str,
) {
    session.advance(phase);
    info!(session = %session.id(), phase = %phase, "phase started");
    progress.report(percent, status);
}
