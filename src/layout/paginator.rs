//! # Pagination
//!
//! Section heights depend on how text wraps at the width a column receives,
//! so nothing can be placed analytically. Instead each column set is packed
//! by measuring and correcting:
//!
//! 1. Build a row group holding every section of the set that still has
//!    rows, each showing *all* of its remaining rows.
//! 2. Add it to the current page and measure the page.
//! 3. If the page fits, the column set is done.
//! 4. Otherwise, if some member cannot show even its header plus one row in
//!    the space left, move the whole group to a fresh page and measure again.
//! 5. Still overflowing: cut every member at the last row that fits, record
//!    where each resumes, and continue the set on a new page.
//!
//! Every cut takes at least one row, so the loop always terminates. A row
//! taller than a whole page is placed anyway and overflows its page.

use std::collections::HashMap;

use super::page_break::Fit;
use super::{LayoutContext, Page, PageState, PageTemplate, RowGroup, TopPanel};
use crate::error::Error;
use crate::model::Document;
use crate::section::SectionRegistry;

pub struct Paginator<'r> {
    template: PageTemplate,
    registry: &'r SectionRegistry,
    ctx: LayoutContext,
}

impl<'r> Paginator<'r> {
    pub fn new(template: PageTemplate, registry: &'r SectionRegistry, ctx: LayoutContext) -> Self {
        Self {
            template,
            registry,
            ctx,
        }
    }

    /// Paginate the document's own block layout.
    pub fn paginate_document(
        &self,
        doc: &Document,
        top: Option<TopPanel>,
    ) -> Result<Vec<Page>, Error> {
        let column_sets = doc.block_layout().by_row(&self.registry.keys());
        self.paginate(doc, &column_sets, top)
    }

    /// Pack the given column sets, in order, into pages. `top` goes at the
    /// head of the first page.
    ///
    /// Fails only if a column set names a key the registry cannot build.
    pub fn paginate(
        &self,
        doc: &Document,
        column_sets: &[Vec<String>],
        top: Option<TopPanel>,
    ) -> Result<Vec<Page>, Error> {
        for key in column_sets.iter().flatten() {
            if !self.registry.contains(key) {
                return Err(Error::Config(format!(
                    "column set names '{}', which has no registered section",
                    key
                )));
            }
        }

        let mut pages = vec![Page::new(&self.template, top)];
        let mut page_full = false;

        for set in column_sets {
            let mut resume: HashMap<&str, usize> = set.iter().map(|k| (k.as_str(), 0)).collect();

            loop {
                let Some(group) = self.build_group(doc, set, &resume)? else {
                    break;
                };
                if page_full {
                    pages.push(Page::new(&self.template, None));
                    page_full = false;
                }
                let mut current = pages.len() - 1;
                pages[current].add_group(group);
                pages[current].validate_layout(&self.ctx);
                if pages[current].fits() {
                    mark_exhausted(&pages[current], &mut resume);
                    continue;
                }

                let states: Vec<PageState> = match pages[current].groups().last() {
                    Some(group) => group
                        .members()
                        .iter()
                        .map(|m| PageState::new(m.as_ref()))
                        .collect(),
                    None => break,
                };
                let mut remaining = pages[current].remaining_for_last_group();

                if pages[current].has_content_above_last_group()
                    && states.iter().any(|s| remaining < s.minimum)
                {
                    log::debug!(
                        "page {}: {:.1}pt left is below a section minimum; deferring group [{}]",
                        current + 1,
                        remaining,
                        set.join(" ")
                    );
                    if let Some(group) = pages[current].remove_last_group() {
                        pages.push(Page::new(&self.template, None));
                        current += 1;
                        pages[current].add_group(group);
                        pages[current].validate_layout(&self.ctx);
                        if pages[current].fits() {
                            mark_exhausted(&pages[current], &mut resume);
                            continue;
                        }
                        remaining = pages[current].remaining_for_last_group();
                    }
                }

                let Some(group) = pages[current].last_group_mut() else {
                    break;
                };
                for (member, state) in group.members_mut().iter_mut().zip(&states) {
                    let count = member.row_count();
                    let end_before = match state.fit(remaining) {
                        Fit::All => count,
                        Fit::Cut { end_before } => {
                            if end_before == state.start + 1
                                && state.overhead + state.heights[state.start] > remaining
                            {
                                log::warn!(
                                    "row {} of '{}' is taller than the space left on page {}",
                                    state.start,
                                    state.key,
                                    current + 1
                                );
                            }
                            member.set_draw_range(state.start..end_before);
                            page_full = true;
                            end_before
                        }
                    };
                    resume.insert(key_of(set, member.key()), end_before);
                }
                if page_full {
                    log::debug!(
                        "page {} full; resuming [{}] at {:?}",
                        current + 1,
                        set.join(" "),
                        resume
                    );
                }
            }
        }

        for page in &mut pages {
            page.force = true;
            page.validate_layout(&self.ctx);
        }
        log::debug!("paginated into {} pages", pages.len());
        Ok(pages)
    }

    /// A group of every section in `set` that still has rows past its
    /// resume point, each showing all of them. `None` once the set is
    /// exhausted.
    fn build_group(
        &self,
        doc: &Document,
        set: &[String],
        resume: &HashMap<&str, usize>,
    ) -> Result<Option<RowGroup>, Error> {
        let mut members = Vec::new();
        for key in set {
            let Some(mut section) = self.registry.create(key, doc)? else {
                continue;
            };
            let start = resume.get(key.as_str()).copied().unwrap_or(0);
            let count = section.row_count();
            if count > start {
                section.set_draw_range(start..count);
                members.push(section);
            }
        }
        Ok(if members.is_empty() {
            None
        } else {
            Some(RowGroup::new(members))
        })
    }
}

/// The set's own copy of `key`, so resume entries borrow from the set.
fn key_of<'s>(set: &'s [String], key: &str) -> &'s str {
    set.iter()
        .map(String::as_str)
        .find(|k| *k == key)
        .unwrap_or_default()
}

fn mark_exhausted<'s>(page: &Page, resume: &mut HashMap<&'s str, usize>) {
    if let Some(group) = page.groups().last() {
        for member in group.members() {
            if let Some(entry) = resume.get_mut(member.key()) {
                *entry = member.row_count();
            }
        }
    }
}
