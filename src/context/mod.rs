//! Application-wide settings context.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;

use crate::bind::{self, Bind, Binding};
use crate::settings::{self, file, Settings, SettingsError};
use crate::Error;

/// Name of the settings file used when none is given.
pub const DEFAULT_FILE_NAME: &str = "config.properties";

/// Holds the settings of one process.
///
/// Create one at startup and pass it to whatever needs settings. The first
/// successful load is kept for the life of the context: later calls return
/// the same [`Settings`] even when given a different path. Use
/// [`reset`](Self::reset) to load again.
///
/// The first load runs exactly once, even when several threads race for it.
///
/// ## Example
///
/// ```no_run
/// use propbind::{AppSettings, Bind, Binding};
///
/// #[derive(Default)]
/// struct Service {
///     port: u16,
///     _name: String,
/// }
///
/// impl Bind for Service {
///     fn binding() -> Binding<Self> {
///         Binding::<Self>::new()
///             .field("port", |s| &mut s.port)
///             .field("_name", |s| &mut s._name)
///     }
/// }
///
/// let settings = AppSettings::new();
///
/// let first_name = &settings.retrieve()?["firstName"];
/// println!("{first_name}");
///
/// let mut service = Service::default();
/// settings.bind(&mut service)?;
///
/// settings.persist("port", "8081")?;
/// # Ok::<(), propbind::Error>(())
/// ```
#[derive(Debug)]
pub struct AppSettings {
    default_file: PathBuf,
    exe_dir: PathBuf,
    cache: OnceCell<Settings>,
    loads: AtomicUsize,
}

impl AppSettings {
    /// Creates a context for `config.properties` beside the executable.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new builder for constructing an `AppSettings`.
    pub fn builder() -> AppSettingsBuilder {
        AppSettingsBuilder::default()
    }

    /// The file used by [`retrieve`](Self::retrieve), [`bind`](Self::bind)
    /// and [`persist`](Self::persist).
    pub fn default_file(&self) -> &Path {
        &self.default_file
    }

    /// The directory used for lookup fallback and `$PATH`.
    pub fn exe_dir(&self) -> &Path {
        &self.exe_dir
    }

    /// Returns the cached settings, loading them from `path` on first use.
    ///
    /// `path` is ignored once settings have been loaded. A relative path that
    /// doesn't exist is retried relative to [`exe_dir`](Self::exe_dir).
    pub fn load(&self, path: impl AsRef<Path>) -> Result<&Settings, SettingsError> {
        self.cache.get_or_try_init(|| {
            let settings = settings::load(path.as_ref(), &self.exe_dir)?;
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(settings)
        })
    }

    /// Settings from the default file.
    pub fn retrieve(&self) -> Result<&Settings, SettingsError> {
        self.load(&self.default_file)
    }

    /// Settings from `path`, unless already loaded.
    pub fn retrieve_from(&self, path: impl AsRef<Path>) -> Result<&Settings, SettingsError> {
        self.load(path)
    }

    /// Binds the default file's settings onto `target`.
    pub fn bind<T: Bind>(&self, target: &mut T) -> Result<(), Error> {
        self.bind_from(target, &self.default_file)
    }

    /// Binds settings onto `target`, loading them from `path` on first use.
    pub fn bind_from<T: Bind>(&self, target: &mut T, path: impl AsRef<Path>) -> Result<(), Error> {
        bind::apply(self.load(path)?, target)?;
        Ok(())
    }

    /// Binds the default file's settings onto `target` with an explicit binding.
    pub fn bind_with<T: 'static>(&self, target: &mut T, binding: &Binding<T>) -> Result<(), Error> {
        binding.apply(self.retrieve()?, target)?;
        Ok(())
    }

    /// Rewrites `name=value` in the default file.
    ///
    /// Only an existing line starting with `name=` is rewritten; returns
    /// `Ok(false)` and leaves the file alone when there is none. Settings
    /// already loaded by this context are not changed.
    pub fn persist(&self, name: &str, value: &str) -> Result<bool, SettingsError> {
        settings::persist_line(&self.default_file, name, value)
    }

    /// Number of times settings were actually read from disk.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Drops the cached settings so the next call loads again.
    ///
    /// Meant for tests; applications normally load once.
    pub fn reset(&mut self) {
        self.cache.take();
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing an [`AppSettings`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppSettingsBuilder {
    default_file: Option<PathBuf>,
    exe_dir: Option<PathBuf>,
}

impl AppSettingsBuilder {
    /// Sets the default settings file.
    ///
    /// A relative path is taken relative to the executable directory.
    pub fn with_default_file(mut self, path: impl AsRef<Path>) -> Self {
        self.default_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Overrides the directory treated as the executable's location.
    pub fn with_exe_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.exe_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> AppSettings {
        let exe_dir = self.exe_dir.unwrap_or_else(file::exe_dir);
        let default_file = exe_dir.join(
            self.default_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME)),
        );

        AppSettings {
            default_file,
            exe_dir,
            cache: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }
}
