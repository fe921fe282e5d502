use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AppSettings, AppSettingsUpdate, BACKUP_VERSION, BackupData, GraduationPolicy,
    GraduationSettings, Payment, PaymentCreate, Plan, Student, StudentCreate, StudentUpdate,
};
use std::sync::Arc;
use std::time::Duration;

use crate::core::{BackgroundTasks, Config, seed};
use crate::data_transfer;
use crate::db::repository::graduation_policy::generate_default;
use crate::db::repository::{AppSettingsStore, GraduationPolicyStore, StudentRepository};
use crate::graduation::{AttendanceProgress, PromotionOutcome, attendance_progress, catalog};
use crate::persistence::{self, PersistHandle, SnapshotSource, SyncStatus};
use crate::reconcile::{
    ReconcileContext, reconcile_app_settings, reconcile_graduation_settings,
    reconcile_students_value,
};
use crate::services::{GeminiTipClient, TipService, TipSource};
use crate::storage::{Storage, StorageSection};

/// 内存数据集 - 三个持久化分区
///
/// 锁顺序固定为 students → graduation → settings。
#[derive(Debug, Default)]
pub struct AcademyData {
    students: RwLock<StudentRepository>,
    graduation: RwLock<GraduationPolicyStore>,
    settings: RwLock<AppSettingsStore>,
}

impl SnapshotSource for AcademyData {
    fn snapshot(&self, section: StorageSection) -> AppResult<Value> {
        match section {
            StorageSection::Students => to_value(section, &self.students.read().list()),
            StorageSection::GraduationSettings => {
                to_value(section, &self.graduation.read().snapshot())
            }
            StorageSection::AppSettings => to_value(section, &self.settings.read().snapshot()),
        }
    }
}

fn to_value<T: Serialize>(section: StorageSection, data: &T) -> AppResult<Value> {
    serde_json::to_value(data)
        .map_err(|e| AppError::internal(format!("Failed to serialize {section}: {e}")))
}

/// 学院状态 - 持有数据集和所有服务的共享引用
///
/// 由进程入口显式构造，传引用给调用方；使用 Arc 实现浅拷贝。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | data | 内存数据集 |
/// | persist | 持久化 worker 句柄 |
/// | tip | 每日提示服务 |
/// | tasks | 后台任务 (shutdown 时取出) |
///
/// # 使用示例
///
/// ```ignore
/// let state = AcademyState::initialize(config, Arc::new(JsonFileStorage::new(dir))).await?;
/// let student = state.add_student(create)?;
/// state.promote(&student.id);
/// state.shutdown().await;
/// ```
#[derive(Clone)]
pub struct AcademyState {
    pub config: Config,
    data: Arc<AcademyData>,
    persist: PersistHandle,
    tip: TipService,
    tasks: Arc<Mutex<Option<BackgroundTasks>>>,
}

impl AcademyState {
    /// 初始化学院状态，每日提示使用配置中的 API
    pub async fn initialize(config: Config, storage: Arc<dyn Storage>) -> AppResult<Self> {
        let tip_client = GeminiTipClient::from_config(&config)?;
        Self::initialize_with_tip(config, storage, Arc::new(tip_client)).await
    }

    /// 初始化学院状态
    ///
    /// 按顺序：
    /// 1. 读取三个分区 (读取失败 → 记录日志并使用默认值)
    /// 2. 修复数据 (reconcile)
    /// 3. 可选写入演示学员
    /// 4. 启动持久化 worker，回写缺失或被修复的分区
    pub async fn initialize_with_tip(
        config: Config,
        storage: Arc<dyn Storage>,
        tip_source: Arc<dyn TipSource>,
    ) -> AppResult<Self> {
        let ctx = ReconcileContext::current();
        let mut dirty: Vec<StorageSection> = Vec::new();

        let raw_students = load_section(storage.as_ref(), StorageSection::Students).await;
        let mut students = match &raw_students {
            Loaded::Found(raw) => {
                let students = reconcile_students_value(raw, &ctx);
                if to_value(StorageSection::Students, &students)? != *raw {
                    dirty.push(StorageSection::Students);
                }
                students
            }
            Loaded::Absent | Loaded::Failed => Vec::new(),
        };
        if matches!(raw_students, Loaded::Absent) && config.seed_demo_data {
            students = seed::demo_students(&ctx);
            tracing::info!(count = students.len(), "Seeded demo students");
            dirty.push(StorageSection::Students);
        }

        let graduation = match load_section(storage.as_ref(), StorageSection::GraduationSettings)
            .await
        {
            Loaded::Found(raw) => {
                let settings = reconcile_graduation_settings(&raw);
                if to_value(StorageSection::GraduationSettings, &settings)? != raw {
                    dirty.push(StorageSection::GraduationSettings);
                }
                settings
            }
            Loaded::Absent => {
                dirty.push(StorageSection::GraduationSettings);
                generate_default()
            }
            Loaded::Failed => generate_default(),
        };

        let settings = match load_section(storage.as_ref(), StorageSection::AppSettings).await {
            Loaded::Found(raw) => {
                let settings = reconcile_app_settings(&raw);
                if to_value(StorageSection::AppSettings, &settings)? != raw {
                    dirty.push(StorageSection::AppSettings);
                }
                settings
            }
            Loaded::Absent => {
                dirty.push(StorageSection::AppSettings);
                AppSettings::default()
            }
            Loaded::Failed => AppSettings::default(),
        };

        let data = Arc::new(AcademyData {
            students: RwLock::new(StudentRepository::new(students)),
            graduation: RwLock::new(GraduationPolicyStore::new(graduation)),
            settings: RwLock::new(AppSettingsStore::new(settings)),
        });

        let mut tasks = BackgroundTasks::new();
        let (persist, worker) = persistence::channel(
            storage,
            data.clone(),
            Duration::from_millis(config.persist_debounce_ms),
            tasks.shutdown_token(),
        );
        tasks.spawn("persistence", worker.run());

        for section in dirty {
            tracing::debug!(section = %section, "Scheduling write-back of repaired section");
            persist.mark_dirty(section);
        }

        tracing::info!(
            students = data.students.read().len(),
            work_dir = %config.work_dir,
            "Academy state initialized"
        );

        Ok(Self {
            config,
            data,
            persist,
            tip: TipService::new(tip_source),
            tasks: Arc::new(Mutex::new(Some(tasks))),
        })
    }

    // ========== Students ==========

    pub fn students(&self) -> Vec<Student> {
        self.data.students.read().list()
    }

    pub fn student(&self, id: &str) -> Option<Student> {
        self.data.students.read().get(id)
    }

    pub fn add_student(&self, data: StudentCreate) -> AppResult<Student> {
        let student = self.data.students.write().add_student(data)?;
        self.persist.mark_dirty(StorageSection::Students);
        Ok(student)
    }

    pub fn update_student(&self, id: &str, data: StudentUpdate) -> AppResult<Student> {
        let student = self.data.students.write().update_student(id, data)?;
        self.persist.mark_dirty(StorageSection::Students);
        Ok(student)
    }

    pub fn log_attendance(&self, id: &str) -> AppResult<Student> {
        let student = self.data.students.write().log_attendance(id)?;
        self.persist.mark_dirty(StorageSection::Students);
        Ok(student)
    }

    pub fn record_payment(&self, id: &str, data: PaymentCreate) -> AppResult<Payment> {
        let payment = self.data.students.write().record_payment(id, data)?;
        self.persist.mark_dirty(StorageSection::Students);
        Ok(payment)
    }

    pub fn promote(&self, id: &str) -> PromotionOutcome {
        let outcome = self.data.students.write().promote(id);
        if outcome.is_promoted() {
            self.persist.mark_dirty(StorageSection::Students);
        }
        outcome
    }

    /// Progress toward the next stripe and belt under the student's policy
    pub fn attendance_progress(&self, id: &str) -> AppResult<AttendanceProgress> {
        let student = self
            .student(id)
            .ok_or_else(|| AppError::student_not_found(id))?;
        let policy = self.graduation_policy(&student.belt.key());
        Ok(attendance_progress(&student, &policy))
    }

    // ========== Graduation settings ==========

    pub fn graduation_policy(&self, belt_key: &str) -> GraduationPolicy {
        self.data.graduation.read().get(belt_key)
    }

    pub fn graduation_settings(&self) -> GraduationSettings {
        self.data.graduation.read().snapshot()
    }

    /// Set the thresholds of one catalog belt
    pub fn update_graduation_policy(
        &self,
        belt_key: &str,
        policy: GraduationPolicy,
    ) -> AppResult<()> {
        if !catalog::all_belts().iter().any(|b| b.key() == belt_key) {
            return Err(AppError::with_message(
                ErrorCode::BeltNotFound,
                format!("No belt with key {belt_key}"),
            )
            .with_detail("beltKey", belt_key));
        }
        self.data.graduation.write().set(belt_key, policy);
        self.persist.mark_dirty(StorageSection::GraduationSettings);
        Ok(())
    }

    pub fn replace_graduation_settings(&self, settings: GraduationSettings) {
        self.data.graduation.write().replace_all(settings);
        self.persist.mark_dirty(StorageSection::GraduationSettings);
    }

    // ========== App settings ==========

    pub fn app_settings(&self) -> AppSettings {
        self.data.settings.read().snapshot()
    }

    pub fn update_app_settings(&self, data: AppSettingsUpdate) -> AppResult<AppSettings> {
        let settings = self.data.settings.write().update(data)?;
        self.persist.mark_dirty(StorageSection::AppSettings);
        Ok(settings)
    }

    pub fn set_plans(&self, plans: Vec<Plan>) -> AppResult<Vec<Plan>> {
        let plans = self.data.settings.write().set_plans(plans)?;
        self.persist.mark_dirty(StorageSection::AppSettings);
        Ok(plans)
    }

    // ========== Backup ==========

    /// Consistent snapshot of all three sections
    pub fn backup_data(&self) -> BackupData {
        let students = self.data.students.read();
        let graduation = self.data.graduation.read();
        let settings = self.data.settings.read();
        BackupData {
            version: BACKUP_VERSION,
            exported_at: Some(shared::util::now()),
            students: students.list(),
            graduation_settings: graduation.snapshot(),
            app_settings: settings.snapshot(),
        }
    }

    pub fn export_backup(&self) -> AppResult<String> {
        data_transfer::export(&self.backup_data())
    }

    /// Replace all state with a backup. Nothing changes unless the whole
    /// document decodes.
    pub fn restore_backup(&self, text: &str) -> AppResult<()> {
        let backup = data_transfer::import(text, &ReconcileContext::current())?;
        let count = backup.students.len();
        {
            let mut students = self.data.students.write();
            let mut graduation = self.data.graduation.write();
            let mut settings = self.data.settings.write();
            students.replace_all(backup.students);
            graduation.replace_all(backup.graduation_settings);
            settings.replace_all(backup.app_settings);
        }
        for section in StorageSection::ALL {
            self.persist.mark_dirty(section);
        }
        tracing::info!(students = count, "Backup restored");
        Ok(())
    }

    // ========== Services ==========

    pub async fn daily_tip(&self) -> String {
        self.tip.daily_tip().await
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.persist.status()
    }

    /// Write pending changes now instead of after the debounce window
    pub async fn flush(&self) {
        self.persist.flush().await;
    }

    /// Stop background tasks, flushing pending changes first. Safe to call
    /// more than once.
    pub async fn shutdown(&self) {
        let tasks = self.tasks.lock().take();
        let Some(tasks) = tasks else {
            return;
        };
        tasks
            .shutdown(Duration::from_millis(self.config.shutdown_timeout_ms))
            .await;
    }
}

enum Loaded {
    Found(Value),
    Absent,
    Failed,
}

async fn load_section(storage: &dyn Storage, section: StorageSection) -> Loaded {
    match storage.load(section).await {
        Ok(Some(raw)) => Loaded::Found(raw),
        Ok(None) => {
            tracing::info!(section = %section, "No stored data, using defaults");
            Loaded::Absent
        }
        Err(e) => {
            tracing::warn!(section = %section, error = %e, "Failed to load section, using defaults");
            Loaded::Failed
        }
    }
}
