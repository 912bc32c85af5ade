//! IKnow REST endpoints
//!
//! Typed wrappers around the endpoints the materials browser and the comment
//! thread consume. All of them go through [`IKnowClient`]'s token-aware
//! request path.

mod page;
mod wire;

pub use page::*;

use wire::DepartmentsEnvelope;
use wire::ExamsEnvelope;
use wire::RepliesEnvelope;
use wire::ReplyCreatedEnvelope;
use wire::SchoolsEnvelope;
use wire::UniversitiesEnvelope;

use crate::IKnowClient;
use crate::error::Error;
use crate::model::Comment;
use crate::model::Department;
use crate::model::Exam;
use crate::model::NewReply;
use crate::model::School;
use crate::model::University;

impl IKnowClient {
    /// Lists universities (first page only).
    ///
    /// `GET /universities/`
    pub async fn universities(&self) -> Result<Vec<University>, Error> {
        let url = self.endpoint("/universities/", &[])?;
        let envelope: UniversitiesEnvelope = self.get_json(url).await?;
        Ok(envelope.universities.unwrap_or_default())
    }

    /// Fetches one page of a university's schools.
    ///
    /// Returns `None` when the response held no school list.
    ///
    /// `GET /schools/?university_id=<id>&page=<n>`
    pub async fn schools_page(
        &self,
        university_id: &str,
        page: u32,
    ) -> Result<Option<Page<School>>, Error> {
        let url = self.endpoint(
            "/schools/",
            &[
                ("university_id", university_id.to_string()),
                ("page", page.to_string()),
            ],
        )?;
        let envelope: SchoolsEnvelope = self.get_json(url).await?;
        Ok(envelope.into_page(page))
    }

    /// Fetches every school of a university, following pages according to
    /// the client's [`PagingPolicy`].
    pub async fn schools(&self, university_id: &str) -> Result<Vec<School>, Error> {
        collect_pages(self.paging_policy(), |page| self.schools_page(university_id, page)).await
    }

    /// Lists a school's departments.
    ///
    /// `GET /departments/tree/<school_id>`
    pub async fn department_tree(&self, school_id: &str) -> Result<Vec<Department>, Error> {
        let path = format!("/departments/tree/{}", urlencoding::encode(school_id));
        let url = self.endpoint(&path, &[])?;
        let envelope: DepartmentsEnvelope = self.get_json(url).await?;
        Ok(envelope.departments.unwrap_or_default())
    }

    /// Lists the exams of one department, year and semester.
    ///
    /// `GET /exams/tree?department_id=<id>&year=<n>&semester=<n>`
    pub async fn exams(
        &self,
        department_id: &str,
        year: u32,
        semester: u8,
    ) -> Result<Vec<Exam>, Error> {
        let url = self.endpoint(
            "/exams/tree",
            &[
                ("department_id", department_id.to_string()),
                ("year", year.to_string()),
                ("semester", semester.to_string()),
            ],
        )?;
        let envelope: ExamsEnvelope = self.get_json(url).await?;
        Ok(envelope.exams.unwrap_or_default())
    }

    /// Fetches one page of replies to a comment.
    ///
    /// `GET /posts/comments/reply?comment_id=<id>&page=<n>`
    pub async fn replies(&self, comment_id: &str, page: u32) -> Result<Page<Comment>, Error> {
        let url = self.endpoint(
            "/posts/comments/reply",
            &[
                ("comment_id", comment_id.to_string()),
                ("page", page.to_string()),
            ],
        )?;
        let envelope: RepliesEnvelope = self.get_json(url).await?;
        Ok(envelope.into_page(page))
    }

    /// Posts a reply. Returns the created reply when the server echoes it.
    ///
    /// `POST /posts/comments/reply`
    pub async fn add_reply(&self, reply: &NewReply) -> Result<Option<Comment>, Error> {
        let url = self.endpoint("/posts/comments/reply", &[])?;
        let envelope: ReplyCreatedEnvelope = self.post_json(url, reply).await?;
        Ok(envelope.reply)
    }
}
