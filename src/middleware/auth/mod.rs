/*
 * Responsibility
 * - Per-route security (cookie token -> SecurityHandler -> RequestContext with claims)
 */
pub mod access;
