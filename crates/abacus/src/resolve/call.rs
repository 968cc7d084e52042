//! Resolution of every identifier argument in a typed operation request.

use crate::ops::{FailureKind, OpRequest, OperationResult};
use crate::workbook::Workbook;

use super::resolver::{describe_candidates, NameResolver, ResolveOutcome, Resolution};

/// Rewrite every sheet/column argument of `request` to a verified
/// identifier, recording one `Resolution` per identifier.
///
/// Returns the rewritten request, or an `AmbiguousReference` failure
/// carrying the scored near-misses — in which case nothing is executed.
pub fn resolve_request(
    book: &Workbook,
    resolver: &NameResolver,
    request: OpRequest,
) -> Result<(OpRequest, Vec<Resolution>), OperationResult> {
    let mut ctx = ResolveContext {
        book,
        resolver,
        records: Vec::new(),
    };

    let resolved = match request {
        OpRequest::ListSheets => OpRequest::ListSheets,
        OpRequest::GetSchema { sheet } => OpRequest::GetSchema {
            sheet: ctx.sheet(&sheet)?,
        },
        OpRequest::FilterRows { sheet, mut predicate } => {
            let sheet = ctx.sheet(&sheet)?;
            predicate.column = ctx.column(&sheet, &predicate.column)?;
            OpRequest::FilterRows { sheet, predicate }
        }
        OpRequest::Aggregate {
            sheet,
            group_by,
            metric,
            aggregator,
        } => {
            let sheet = ctx.sheet(&sheet)?;
            let group_by = group_by
                .iter()
                .map(|c| ctx.column(&sheet, c))
                .collect::<Result<Vec<_>, _>>()?;
            let metric = ctx.column(&sheet, &metric)?;
            OpRequest::Aggregate {
                sheet,
                group_by,
                metric,
                aggregator,
            }
        }
        OpRequest::PivotTable {
            sheet,
            row_keys,
            column_keys,
            value_column,
            aggregator,
        } => {
            let sheet = ctx.sheet(&sheet)?;
            let row_keys = row_keys
                .iter()
                .map(|c| ctx.column(&sheet, c))
                .collect::<Result<Vec<_>, _>>()?;
            let column_keys = column_keys
                .iter()
                .map(|c| ctx.column(&sheet, c))
                .collect::<Result<Vec<_>, _>>()?;
            let value_column = ctx.column(&sheet, &value_column)?;
            OpRequest::PivotTable {
                sheet,
                row_keys,
                column_keys,
                value_column,
                aggregator,
            }
        }
        // The candidate itself is the fuzzy query; only the scope sheet
        // is an identifier.
        OpRequest::FindColumn { candidate, sheet } => OpRequest::FindColumn {
            candidate,
            sheet: match sheet {
                Some(s) => Some(ctx.sheet(&s)?),
                None => None,
            },
        },
    };

    Ok((resolved, ctx.records))
}

struct ResolveContext<'a> {
    book: &'a Workbook,
    resolver: &'a NameResolver,
    records: Vec<Resolution>,
}

impl ResolveContext<'_> {
    fn sheet(&mut self, candidate: &str) -> Result<String, OperationResult> {
        let names = self.book.sheet_names();
        match self.resolver.resolve(candidate, &names) {
            ResolveOutcome::Match(resolution) => {
                let resolved = resolution.resolved.clone();
                self.records.push(resolution);
                Ok(resolved)
            }
            ResolveOutcome::Ambiguous(candidates) => Err(OperationResult::failure(
                FailureKind::AmbiguousReference,
                format!(
                    "cannot resolve sheet '{candidate}'; closest: {}",
                    describe_candidates(&candidates)
                ),
            )),
        }
    }

    fn column(&mut self, sheet: &str, candidate: &str) -> Result<String, OperationResult> {
        let names: Vec<&str> = self
            .book
            .schema(sheet)
            .map(|cols| cols.iter().map(|c| c.name.as_str()).collect())
            .unwrap_or_default();
        match self.resolver.resolve(candidate, &names) {
            ResolveOutcome::Match(resolution) => {
                let resolved = resolution.resolved.clone();
                self.records.push(resolution);
                Ok(resolved)
            }
            ResolveOutcome::Ambiguous(candidates) => Err(OperationResult::failure(
                FailureKind::AmbiguousReference,
                format!(
                    "cannot resolve column '{candidate}' in sheet '{sheet}'; closest: {}",
                    describe_candidates(&candidates)
                ),
            )),
        }
    }
}
