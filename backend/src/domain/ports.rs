//! Ports exposed by the domain to inbound and outbound adapters.
//!
//! The repository port has one store-backed implementation
//! ([`crate::outbound::persistence::DieselCountryRepository`]) and the
//! in-memory [`InMemoryCountryRepository`] used by handler tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use pagination::{PageRequest, PagedResult};

use super::{Country, CountryDraft, RepositoryError};

/// Store-backed access to country records.
///
/// All operations are store round-trips; none mutate in-memory state beyond
/// what is returned. Reads and existence checks never see soft-deleted rows.
#[async_trait]
pub trait CountryRepository: Send + Sync {
    /// One page of non-deleted rows ordered by name, optionally filtered by
    /// a case-insensitive substring match over name or code. The total is
    /// counted before pagination.
    async fn get_all(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<PagedResult<Country>, RepositoryError>;

    /// The non-deleted row with this id, if any. Absence is not an error.
    async fn get_by_id(&self, id: i32) -> Result<Option<Country>, RepositoryError>;

    /// Persist a new row. The store assigns the id; `created_date` is set to
    /// now (UTC) and `is_deleted` to false. Unique-constraint violations
    /// surface as [`RepositoryError::DuplicateName`] or
    /// [`RepositoryError::DuplicateCode`].
    async fn add(&self, draft: &CountryDraft) -> Result<Country, RepositoryError>;

    /// Overwrite only name and code on an existing non-deleted row.
    async fn update(&self, id: i32, draft: &CountryDraft) -> Result<Country, RepositoryError>;

    /// Flip `is_deleted` on a live row. Fails with
    /// [`RepositoryError::AlreadyDeleted`] when the flag is already set.
    async fn soft_delete(&self, id: i32) -> Result<(), RepositoryError>;

    /// Whether a non-deleted row other than `exclude_id` holds this name.
    async fn exists_by_name(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, RepositoryError>;

    /// Whether a non-deleted row other than `exclude_id` holds this code.
    async fn exists_by_code(
        &self,
        code: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, RepositoryError>;
}

#[derive(Default)]
struct InMemoryState {
    rows: Vec<Country>,
    next_id: i32,
}

/// In-memory [`CountryRepository`] with the same observable semantics as the
/// PostgreSQL adapter, including the duplicate rejection the partial unique
/// indexes would enforce. Backs handler tests and doc examples.
#[derive(Default)]
pub struct InMemoryCountryRepository {
    state: Mutex<InMemoryState>,
}

impl InMemoryCountryRepository {
    /// Create an empty repository; ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live_duplicate(
        state: &InMemoryState,
        draft: &CountryDraft,
        exclude_id: Option<i32>,
    ) -> Option<RepositoryError> {
        let mut others = state
            .rows
            .iter()
            .filter(|row| !row.is_deleted && Some(row.id) != exclude_id);
        // Name wins when both fields collide, matching the check order the
        // controller uses.
        if others.clone().any(|row| row.name == draft.name()) {
            return Some(RepositoryError::DuplicateName);
        }
        if others.any(|row| row.code == draft.code()) {
            return Some(RepositoryError::DuplicateCode);
        }
        None
    }
}

#[async_trait]
impl CountryRepository for InMemoryCountryRepository {
    async fn get_all(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<PagedResult<Country>, RepositoryError> {
        let state = self.lock();
        let needle = search.map(str::to_lowercase);
        let mut matching: Vec<Country> = state
            .rows
            .iter()
            .filter(|row| !row.is_deleted)
            .filter(|row| {
                needle.as_deref().is_none_or(|term| {
                    row.name.to_lowercase().contains(term)
                        || row.code.to_lowercase().contains(term)
                })
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));

        let total = matching.len() as u64;
        let offset = (page.page_number() as usize - 1) * page.page_size() as usize;
        let data: Vec<Country> = matching
            .into_iter()
            .skip(offset)
            .take(page.page_size() as usize)
            .collect();
        Ok(PagedResult::new(data, total, page))
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Country>, RepositoryError> {
        let state = self.lock();
        Ok(state
            .rows
            .iter()
            .find(|row| row.id == id && !row.is_deleted)
            .cloned())
    }

    async fn add(&self, draft: &CountryDraft) -> Result<Country, RepositoryError> {
        let mut state = self.lock();
        if let Some(duplicate) = Self::live_duplicate(&state, draft, None) {
            return Err(duplicate);
        }
        state.next_id += 1;
        let country = Country {
            id: state.next_id,
            name: draft.name().to_owned(),
            code: draft.code().to_owned(),
            created_date: Utc::now(),
            is_deleted: false,
        };
        state.rows.push(country.clone());
        Ok(country)
    }

    async fn update(&self, id: i32, draft: &CountryDraft) -> Result<Country, RepositoryError> {
        let mut state = self.lock();
        if !state.rows.iter().any(|row| row.id == id && !row.is_deleted) {
            return Err(RepositoryError::NotFound);
        }
        if let Some(duplicate) = Self::live_duplicate(&state, draft, Some(id)) {
            return Err(duplicate);
        }
        let row = state
            .rows
            .iter_mut()
            .find(|row| row.id == id && !row.is_deleted)
            .ok_or(RepositoryError::NoRowsAffected)?;
        row.name = draft.name().to_owned();
        row.code = draft.code().to_owned();
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i32) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let row = state
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if row.is_deleted {
            return Err(RepositoryError::AlreadyDeleted);
        }
        row.is_deleted = true;
        Ok(())
    }

    async fn exists_by_name(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, RepositoryError> {
        let state = self.lock();
        Ok(state
            .rows
            .iter()
            .any(|row| !row.is_deleted && Some(row.id) != exclude_id && row.name == name))
    }

    async fn exists_by_code(
        &self,
        code: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, RepositoryError> {
        let state = self.lock();
        Ok(state
            .rows
            .iter()
            .any(|row| !row.is_deleted && Some(row.id) != exclude_id && row.code == code))
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour coverage for the in-memory fixture; the HTTP tests lean on
    //! these semantics matching the PostgreSQL adapter.
    use super::*;
    use rstest::rstest;

    fn draft(name: &str, code: &str) -> CountryDraft {
        CountryDraft::new(name, code).expect("valid draft")
    }

    async fn seeded(entries: &[(&str, &str)]) -> InMemoryCountryRepository {
        let repo = InMemoryCountryRepository::new();
        for (name, code) in entries {
            repo.add(&draft(name, code)).await.expect("seed row");
        }
        repo
    }

    #[rstest]
    #[actix_rt::test]
    async fn add_assigns_sequential_ids_and_defaults() {
        let repo = InMemoryCountryRepository::new();
        let first = repo.add(&draft("Wonderland", "WL")).await.expect("add");
        let second = repo.add(&draft("Oz", "OZ")).await.expect("add");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(!first.is_deleted);
    }

    #[rstest]
    #[actix_rt::test]
    async fn add_rejects_live_duplicates_name_first() {
        let repo = seeded(&[("Wonderland", "WL")]).await;
        // Both fields collide; the name error wins.
        assert_eq!(
            repo.add(&draft("Wonderland", "WL")).await,
            Err(RepositoryError::DuplicateName)
        );
        assert_eq!(
            repo.add(&draft("Oz", "WL")).await,
            Err(RepositoryError::DuplicateCode)
        );
    }

    #[rstest]
    #[actix_rt::test]
    async fn deleted_rows_release_their_name_and_code() {
        let repo = seeded(&[("Wonderland", "WL")]).await;
        repo.soft_delete(1).await.expect("delete");
        let replacement = repo.add(&draft("Wonderland", "WL")).await.expect("re-add");
        assert_eq!(replacement.id, 2);
    }

    #[rstest]
    #[actix_rt::test]
    async fn get_all_orders_by_name_and_counts_before_pagination() {
        let repo = seeded(&[("Banana", "BB"), ("Apple", "AA"), ("Cherry", "CC")]).await;
        let page = repo
            .get_all(PageRequest::new(1, 2).expect("valid page"), None)
            .await
            .expect("page");
        let names: Vec<&str> = page.data.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Banana"]);
        assert_eq!(page.total_records, 3);
        assert_eq!(page.total_pages(), 2);
    }

    #[rstest]
    #[case("apple", 1)]
    #[case("AA", 1)]
    #[case("a", 2)]
    #[case("zz", 0)]
    #[actix_rt::test]
    async fn search_is_case_insensitive_over_name_and_code(
        #[case] term: &str,
        #[case] expected: u64,
    ) {
        let repo = seeded(&[("Apple", "AA"), ("Banana", "BB")]).await;
        let page = repo
            .get_all(PageRequest::default(), Some(term))
            .await
            .expect("page");
        assert_eq!(page.total_records, expected);
    }

    #[rstest]
    #[actix_rt::test]
    async fn soft_deleted_rows_are_invisible_to_reads() {
        let repo = seeded(&[("Wonderland", "WL")]).await;
        repo.soft_delete(1).await.expect("delete");
        assert_eq!(repo.get_by_id(1).await, Ok(None));
        let page = repo
            .get_all(PageRequest::default(), None)
            .await
            .expect("page");
        assert_eq!(page.total_records, 0);
        assert_eq!(repo.exists_by_name("Wonderland", None).await, Ok(false));
    }

    #[rstest]
    #[actix_rt::test]
    async fn delete_twice_reports_already_deleted() {
        let repo = seeded(&[("Wonderland", "WL")]).await;
        repo.soft_delete(1).await.expect("delete");
        assert_eq!(
            repo.soft_delete(1).await,
            Err(RepositoryError::AlreadyDeleted)
        );
        assert_eq!(repo.soft_delete(99).await, Err(RepositoryError::NotFound));
    }

    #[rstest]
    #[actix_rt::test]
    async fn update_excludes_own_row_from_uniqueness() {
        let repo = seeded(&[("Wonderland", "WL"), ("Oz", "OZ")]).await;
        let unchanged = repo.update(1, &draft("Wonderland", "WL")).await;
        assert!(unchanged.is_ok());
        assert_eq!(
            repo.update(2, &draft("Wonderland", "XX")).await,
            Err(RepositoryError::DuplicateName)
        );
    }

    #[rstest]
    #[actix_rt::test]
    async fn exists_checks_honour_exclude_id() {
        let repo = seeded(&[("Wonderland", "WL")]).await;
        assert_eq!(repo.exists_by_name("Wonderland", None).await, Ok(true));
        assert_eq!(repo.exists_by_name("Wonderland", Some(1)).await, Ok(false));
        assert_eq!(repo.exists_by_code("WL", Some(1)).await, Ok(false));
        assert_eq!(repo.exists_by_code("WL", Some(2)).await, Ok(true));
    }
}
