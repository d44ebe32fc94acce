use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime},
    options::{
        FindOneAndUpdateOptions, FindOneOptions, FindOptions, IndexOptions, ReturnDocument,
    },
    Client as MongoClient, Collection, Database, IndexModel,
};

use crate::error::AppError;
use crate::models::{
    CaseFile, CaseFileSummary, Notification, NotificationStatus, Permit, Question, QuestionStatus,
    CONSENT_UNMANAGED, STATUS_PENDING_REVIEW,
};

/// Typed access to the four legacy collections. The client is cheap to
/// clone; one instance is shared through the application state.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await?;
        let db = client.database(database);
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes");

        self.permits()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "Pe_Documento": 1 })
                    .options(
                        IndexOptions::builder()
                            .name("pe_documento_idx".to_string())
                            .build(),
                    )
                    .build(),
                None,
            )
            .await?;

        self.case_files()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "DOCUMENTO": 1 })
                    .options(
                        IndexOptions::builder()
                            .name("documento_idx".to_string())
                            .build(),
                    )
                    .build(),
                None,
            )
            .await?;

        self.case_files()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "H_ESTADO_NOTIFICACION_CONSENTIMIENTO": 1 })
                    .options(
                        IndexOptions::builder()
                            .name("consentimiento_idx".to_string())
                            .build(),
                    )
                    .build(),
                None,
            )
            .await?;

        // The per-user listing and the latest-active lookup both walk
        // this compound index newest first.
        self.notifications()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "id_usuario": 1, "estado": 1, "createdAt": -1 })
                    .options(
                        IndexOptions::builder()
                            .name("usuario_estado_created_idx".to_string())
                            .build(),
                    )
                    .build(),
                None,
            )
            .await?;

        self.notifications()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "createdAt": -1 })
                    .options(
                        IndexOptions::builder()
                            .name("created_idx".to_string())
                            .build(),
                    )
                    .build(),
                None,
            )
            .await?;

        self.questions()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "estado": 1, "tipo": 1 })
                    .options(
                        IndexOptions::builder()
                            .name("estado_tipo_idx".to_string())
                            .build(),
                    )
                    .build(),
                None,
            )
            .await?;

        tracing::info!("MongoDB indexes ready");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn permits(&self) -> Collection<Permit> {
        self.db.collection("permisos")
    }

    pub fn case_files(&self) -> Collection<CaseFile> {
        self.db.collection("hojas_vida")
    }

    pub fn notifications(&self) -> Collection<Notification> {
        self.db.collection("Cl_Notificaciones_mail_whatsapp")
    }

    pub fn questions(&self) -> Collection<Question> {
        self.db.collection("cl_preguntas_psicologia")
    }

    pub async fn find_permit_by_document(
        &self,
        documento: &str,
    ) -> Result<Option<Permit>, AppError> {
        let permit = self
            .permits()
            .find_one(doc! { "Pe_Documento": documento }, None)
            .await?;
        Ok(permit)
    }

    /// Case lookup with the fixed projection the document screen needs.
    pub async fn find_case_summary_by_document(
        &self,
        documento: &str,
    ) -> Result<Option<CaseFileSummary>, AppError> {
        let options = FindOneOptions::builder()
            .projection(doc! {
                "DOCUMENTO": 1,
                "NOMBRE": 1,
                "PRIMER_APELLIDO": 1,
                "SEGUNDO_APELLIDO": 1,
                "ESTADO": 1,
                "TEXT_NOTIFICACION": 1,
                "FECHA_INSCRIPCION": 1,
            })
            .build();
        let summary = self
            .case_files()
            .clone_with_type::<CaseFileSummary>()
            .find_one(doc! { "DOCUMENTO": documento }, options)
            .await?;
        Ok(summary)
    }

    pub async fn insert_notification(
        &self,
        notification: &Notification,
    ) -> Result<ObjectId, AppError> {
        let result = self.notifications().insert_one(notification, None).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("inserted_id was not an ObjectId")))
    }

    pub async fn list_notifications_by_user(
        &self,
        id_usuario: ObjectId,
    ) -> Result<Vec<Notification>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();
        let cursor = self
            .notifications()
            .find(doc! { "id_usuario": id_usuario }, options)
            .await?;
        let notifications = cursor.try_collect().await?;
        Ok(notifications)
    }

    pub async fn list_all_notifications(&self) -> Result<Vec<Notification>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();
        let cursor = self.notifications().find(doc! {}, options).await?;
        let notifications = cursor.try_collect().await?;
        Ok(notifications)
    }

    /// Updates `estado` for the `(id, id_usuario)` pair and returns the
    /// post-update record; `None` when the pair matched nothing.
    pub async fn update_notification_status(
        &self,
        id: ObjectId,
        id_usuario: ObjectId,
        estado: NotificationStatus,
    ) -> Result<Option<Notification>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .notifications()
            .find_one_and_update(
                doc! { "_id": id, "id_usuario": id_usuario },
                doc! { "$set": {
                    "estado": estado.to_string(),
                    "updatedAt": BsonDateTime::now(),
                } },
                options,
            )
            .await?;
        Ok(updated)
    }

    pub async fn find_notification_by_id(
        &self,
        id: ObjectId,
    ) -> Result<Option<Notification>, AppError> {
        let notification = self
            .notifications()
            .find_one(doc! { "_id": id }, None)
            .await?;
        Ok(notification)
    }

    pub async fn find_latest_active_notification_for(
        &self,
        case_id: ObjectId,
    ) -> Result<Option<Notification>, AppError> {
        let options = FindOneOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();
        let notification = self
            .notifications()
            .find_one(
                doc! {
                    "id_usuario": case_id,
                    "estado": NotificationStatus::Activo.to_string(),
                },
                options,
            )
            .await?;
        Ok(notification)
    }

    pub async fn list_pending_consent_cases(&self) -> Result<Vec<CaseFile>, AppError> {
        let cursor = self
            .case_files()
            .find(
                doc! { "H_ESTADO_NOTIFICACION_CONSENTIMIENTO": CONSENT_UNMANAGED },
                None,
            )
            .await?;
        let cases = cursor.try_collect().await?;
        Ok(cases)
    }

    /// Records the uploaded PDF path and moves the case into review.
    pub async fn attach_case_pdf(
        &self,
        id: ObjectId,
        pdf_url: &str,
    ) -> Result<Option<CaseFile>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .case_files()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": {
                    "PDF_URL": pdf_url,
                    "ESTADO": STATUS_PENDING_REVIEW,
                } },
                options,
            )
            .await?;
        Ok(updated)
    }

    pub async fn find_case_by_id(&self, id: ObjectId) -> Result<Option<CaseFile>, AppError> {
        let case = self.case_files().find_one(doc! { "_id": id }, None).await?;
        Ok(case)
    }

    pub async fn insert_questions(&self, questions: &[Question]) -> Result<usize, AppError> {
        let result = self.questions().insert_many(questions, None).await?;
        Ok(result.inserted_ids.len())
    }

    pub async fn list_active_questions(&self) -> Result<Vec<Question>, AppError> {
        let options = FindOptions::builder().sort(doc! { "tipo": 1 }).build();
        let cursor = self
            .questions()
            .find(
                doc! { "estado": QuestionStatus::Activo.to_string() },
                options,
            )
            .await?;
        let questions = cursor.try_collect().await?;
        Ok(questions)
    }

    pub async fn update_question_status(
        &self,
        id: ObjectId,
        estado: QuestionStatus,
        id_usuario_actualiza: ObjectId,
    ) -> Result<Option<Question>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .questions()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": {
                    "estado": estado.to_string(),
                    "id_usuario_actualiza": id_usuario_actualiza,
                    "updatedAt": BsonDateTime::now(),
                } },
                options,
            )
            .await?;
        Ok(updated)
    }
}
