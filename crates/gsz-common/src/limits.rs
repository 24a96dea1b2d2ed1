//! Centralized limits and thresholds for the gsz front end.
//!
//! Recursive algorithms in the resolver are bounded structurally (visited sets,
//! one mangled dot per recursion step), but pathological inputs can still chain
//! many of those steps together. The limits here turn such inputs into a
//! diagnostic instead of a stack overflow.

// =============================================================================
// Recursion Depth Limits (Resolver)
// =============================================================================

/// Maximum nesting of recursive type-resolution attempts for one reference.
///
/// Every strategy that builds a candidate reference (static inner retries,
/// alias partial matches, default-import candidates, nested lookups) re-enters
/// the cascade. A dotted name with N segments needs at most N levels of
/// static-inner retries, each of which can spawn one more level of candidate
/// resolution.
///
/// ```groovy
/// // 60 segments deep: every retry mangles one more dot into '$'
/// a.b.c.d.e.f.g.h.i.j.k.l.m.n.o.p.q.r.s.t.u.v.w.x.y.z /* ... */ x
/// ```
pub const MAX_TYPE_RESOLUTION_DEPTH: u32 = 128;

/// Maximum number of ancestors visited while walking a superclass chain or an
/// interface graph.
///
/// Walks are already guarded by a visited set, so this only matters for
/// enormous but acyclic hierarchies pulled in from external types.
pub const MAX_HIERARCHY_WALK: usize = 4_096;

/// Maximum depth of nested type declarations the driver descends into.
///
/// ```groovy
/// class A { class B { class C { /* ... 256 levels ... */ } } }
/// ```
pub const MAX_TYPE_DECLARATION_DEPTH: u32 = 256;
